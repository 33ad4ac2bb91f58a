//! Document abstraction.
//!
//! The script-tag bridge reads attributes, walks parents, inserts elements and
//! listens for form submission. [`Document`] is the minimal surface it needs,
//! so the same bridge runs against a browser binding or the in-memory
//! [`MemoryDocument`].
//!
//! Listeners follow browser dispatch rules: on each submit event every
//! listener's synchronous part runs in registration order, and any work it
//! returns as a future completes later.

mod memory;

pub use memory::*;

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::sdk::BoxFuture;

/// Submit event passed to listeners.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: AtomicBool,
}

impl SubmitEvent {
    /// Creates an event whose default action is still pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels native form submission for this event.
    pub fn prevent_default(&self) {
        self.default_prevented.store(true, Ordering::SeqCst);
    }

    /// Returns `true` if a listener cancelled native submission.
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }
}

/// Submit listener.
///
/// Called synchronously during dispatch; the returned future carries any
/// deferred work.
pub type SubmitListener = Arc<dyn Fn(&SubmitEvent) -> BoxFuture<'static, ()> + Send + Sync>;

/// A document tree the bridge can inspect and mutate.
///
/// All methods take `&self`; implementations use interior mutability so the
/// document can be shared with listeners.
pub trait Document: Send + Sync + 'static {
    /// Handle to an element in the tree.
    type Element: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Returns an attribute value.
    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Returns the element's tag name.
    fn tag_name(&self, element: &Self::Element) -> String;

    /// Returns the parent node, or `None` at the root.
    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Creates a detached element.
    fn create_element(&self, tag: &str) -> Self::Element;

    /// Sets an attribute.
    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);

    /// Sets the current value of a form control.
    fn set_value(&self, element: &Self::Element, value: &str);

    /// Inserts `node` into `parent` immediately before `reference`.
    ///
    /// Ignored when `node` is `parent` or one of its ancestors.
    fn insert_before(&self, parent: &Self::Element, node: &Self::Element, reference: &Self::Element);

    /// Appends `child` as the last child of `parent`.
    ///
    /// Ignored when `child` is `parent` or one of its ancestors.
    fn append_child(&self, parent: &Self::Element, child: &Self::Element);

    /// Finds the first descendant of `root` whose `name` attribute is `name`.
    fn find_by_name(&self, root: &Self::Element, name: &str) -> Option<Self::Element>;

    /// Registers a submit listener on a form.
    fn add_submit_listener(&self, form: &Self::Element, listener: SubmitListener);

    /// Submits the form natively, without dispatching a submit event.
    fn submit(&self, form: &Self::Element);
}

/// Walks up from `element` to the nearest enclosing `form`.
///
/// Stops at the root; the element itself is not considered.
pub fn find_parent_form<D: Document + ?Sized>(
    document: &D,
    element: &D::Element,
) -> Option<D::Element> {
    let mut current = document.parent(element);
    while let Some(node) = current {
        if document.tag_name(&node).eq_ignore_ascii_case("form") {
            return Some(node);
        }
        current = document.parent(&node);
    }
    None
}

/// Sets the value of the hidden input `name` in `form`, creating it if the
/// form has none yet.
pub fn upsert_hidden_input<D: Document + ?Sized>(
    document: &D,
    form: &D::Element,
    name: &str,
    value: &str,
) -> D::Element {
    let input = document.find_by_name(form, name).unwrap_or_else(|| {
        let input = document.create_element("input");
        document.set_attribute(&input, "type", "hidden");
        document.set_attribute(&input, "name", name);
        document.append_child(form, &input);
        input
    });
    document.set_value(&input, value);
    input
}
