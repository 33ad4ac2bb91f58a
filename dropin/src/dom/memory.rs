//! In-memory [`Document`] implementation.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Document, SubmitEvent, SubmitListener};
use crate::sdk::BoxFuture;

/// Handle to a node of a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    value: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            attributes: BTreeMap::new(),
            value: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// A form submitted natively, with the fields it carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// The submitted form.
    pub form: NodeId,
    /// `(name, value)` of every named `input` in the form, in document order.
    pub fields: Vec<(String, String)>,
}

/// A document tree held in memory.
///
/// Node `0` is the document root. Native submissions are recorded instead of
/// navigating, so callers can inspect them with [`Self::submissions`].
pub struct MemoryDocument {
    nodes: Mutex<Vec<Node>>,
    listeners: Mutex<HashMap<NodeId, Vec<SubmitListener>>>,
    submissions: Mutex<Vec<Submission>>,
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("nodes", &lock(&self.nodes).len())
            .field("submissions", &lock(&self.submissions).len())
            .finish_non_exhaustive()
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryDocument {
    /// Creates a document containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Mutex::new(vec![Node::new("#document")]),
            listeners: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Returns the document root.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Creates an element with attributes and appends it to `parent`.
    pub fn element(&self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let id = self.create_element(tag);
        for (name, value) in attributes {
            self.set_attribute(&id, name, value);
        }
        self.append_child(&parent, &id);
        id
    }

    /// Returns the number of nodes, detached ones included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        lock(&self.nodes).len()
    }

    /// Returns the children of `id` in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        lock(&self.nodes)
            .get(id.0)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Returns the current value of a form control.
    #[must_use]
    pub fn value(&self, id: NodeId) -> Option<String> {
        lock(&self.nodes).get(id.0).and_then(|node| node.value.clone())
    }

    /// Finds an attached element by its `id` attribute.
    #[must_use]
    pub fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        let nodes = lock(&self.nodes);
        descendants(&nodes, self.root())
            .into_iter()
            .find(|id| nodes[id.0].attributes.get("id").map(String::as_str) == Some(element_id))
    }

    /// Returns every descendant of `root` whose `name` attribute is `name`.
    #[must_use]
    pub fn elements_by_name(&self, root: NodeId, name: &str) -> Vec<NodeId> {
        let nodes = lock(&self.nodes);
        descendants(&nodes, root)
            .into_iter()
            .filter(|id| nodes[id.0].attributes.get("name").map(String::as_str) == Some(name))
            .collect()
    }

    /// Returns the `(name, value)` pairs a native submission of `form` sends.
    #[must_use]
    pub fn form_fields(&self, form: NodeId) -> Vec<(String, String)> {
        let nodes = lock(&self.nodes);
        descendants(&nodes, form)
            .into_iter()
            .map(|id| &nodes[id.0])
            .filter(|node| node.tag.eq_ignore_ascii_case("input"))
            .filter_map(|node| {
                let name = node.attributes.get("name")?.clone();
                let value = node
                    .value
                    .clone()
                    .or_else(|| node.attributes.get("value").cloned())
                    .unwrap_or_default();
                Some((name, value))
            })
            .collect()
    }

    /// Returns the number of submit listeners registered on `form`.
    #[must_use]
    pub fn listener_count(&self, form: NodeId) -> usize {
        lock(&self.listeners).get(&form).map_or(0, Vec::len)
    }

    /// Returns every native submission so far.
    #[must_use]
    pub fn submissions(&self) -> Vec<Submission> {
        lock(&self.submissions).clone()
    }

    /// Dispatches a submit event on `form`, as a click on a submit button
    /// would.
    ///
    /// Listeners run synchronously in registration order before this returns.
    /// If none prevented the default action the form is submitted natively
    /// right away. The returned future drives the listeners' deferred work and
    /// resolves to whether the default action was prevented.
    pub fn dispatch_submit(&self, form: NodeId) -> BoxFuture<'static, bool> {
        let listeners: Vec<SubmitListener> = lock(&self.listeners)
            .get(&form)
            .cloned()
            .unwrap_or_default();

        let event = SubmitEvent::new();
        let deferred: Vec<BoxFuture<'static, ()>> =
            listeners.iter().map(|listener| listener(&event)).collect();

        let prevented = event.default_prevented();
        if !prevented {
            self.submit(&form);
        }

        Box::pin(async move {
            for work in deferred {
                work.await;
            }
            prevented
        })
    }

    fn detach(nodes: &mut [Node], id: NodeId) {
        if let Some(parent) = nodes[id.0].parent.take() {
            nodes[parent.0].children.retain(|child| *child != id);
        }
    }
}

/// Whether `child` may be placed under `parent` without forming a cycle.
///
/// Refuses unknown ids and any `child` that is `parent` or one of its
/// ancestors.
fn can_adopt(nodes: &[Node], parent: NodeId, child: NodeId) -> bool {
    if parent.0 >= nodes.len() || child.0 >= nodes.len() {
        return false;
    }
    let mut current = Some(parent);
    while let Some(id) = current {
        if id == child {
            return false;
        }
        current = nodes[id.0].parent;
    }
    true
}

/// Depth-first, document-order descendants of `root`, excluding `root`.
fn descendants(nodes: &[Node], root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = nodes
        .get(root.0)
        .map(|node| node.children.iter().rev().copied().collect())
        .unwrap_or_default();
    while let Some(id) = stack.pop() {
        out.push(id);
        stack.extend(nodes[id.0].children.iter().rev().copied());
    }
    out
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        lock(&self.nodes)
            .get(element.0)
            .and_then(|node| node.attributes.get(name).cloned())
    }

    fn tag_name(&self, element: &NodeId) -> String {
        lock(&self.nodes)
            .get(element.0)
            .map(|node| node.tag.to_ascii_uppercase())
            .unwrap_or_default()
    }

    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        lock(&self.nodes).get(element.0).and_then(|node| node.parent)
    }

    fn create_element(&self, tag: &str) -> NodeId {
        let mut nodes = lock(&self.nodes);
        nodes.push(Node::new(tag));
        NodeId(nodes.len() - 1)
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) {
        if let Some(node) = lock(&self.nodes).get_mut(element.0) {
            node.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    fn set_value(&self, element: &NodeId, value: &str) {
        if let Some(node) = lock(&self.nodes).get_mut(element.0) {
            node.value = Some(value.to_owned());
        }
    }

    fn insert_before(&self, parent: &NodeId, node: &NodeId, reference: &NodeId) {
        let mut nodes = lock(&self.nodes);
        if !can_adopt(&nodes, *parent, *node) {
            return;
        }
        Self::detach(&mut nodes, *node);
        let children = &mut nodes[parent.0].children;
        let index = children
            .iter()
            .position(|child| child == reference)
            .unwrap_or(children.len());
        children.insert(index, *node);
        nodes[node.0].parent = Some(*parent);
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) {
        let mut nodes = lock(&self.nodes);
        if !can_adopt(&nodes, *parent, *child) {
            return;
        }
        Self::detach(&mut nodes, *child);
        nodes[parent.0].children.push(*child);
        nodes[child.0].parent = Some(*parent);
    }

    fn find_by_name(&self, root: &NodeId, name: &str) -> Option<NodeId> {
        self.elements_by_name(*root, name).into_iter().next()
    }

    fn add_submit_listener(&self, form: &NodeId, listener: SubmitListener) {
        lock(&self.listeners).entry(*form).or_default().push(listener);
    }

    fn submit(&self, form: &NodeId) {
        let fields = self.form_fields(*form);
        lock(&self.submissions).push(Submission {
            form: *form,
            fields,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::find_parent_form;
    use std::sync::Arc;

    #[test]
    fn test_insert_before_places_sibling() {
        let doc = MemoryDocument::new();
        let form = doc.element(doc.root(), "form", &[]);
        let first = doc.element(form, "input", &[]);
        let script = doc.element(form, "script", &[]);
        let container = doc.create_element("div");

        doc.insert_before(&form, &container, &script);

        assert_eq!(doc.children(form), vec![first, container, script]);
        assert_eq!(doc.parent(&container), Some(form));
    }

    #[test]
    fn test_append_child_moves_node() {
        let doc = MemoryDocument::new();
        let a = doc.element(doc.root(), "div", &[]);
        let b = doc.element(doc.root(), "div", &[]);
        let child = doc.element(a, "span", &[]);

        doc.append_child(&b, &child);

        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), vec![child]);
    }

    #[test]
    fn test_ancestor_cannot_become_descendant() {
        let doc = MemoryDocument::new();
        let form = doc.element(doc.root(), "form", &[]);
        let outer = doc.element(form, "div", &[]);
        let inner = doc.element(outer, "div", &[]);
        let script = doc.element(inner, "script", &[]);

        doc.append_child(&inner, &outer);
        doc.insert_before(&inner, &outer, &script);
        doc.append_child(&outer, &outer);
        doc.append_child(&script, &doc.root());

        assert_eq!(doc.parent(&outer), Some(form));
        assert_eq!(doc.children(inner), vec![script]);
        assert_eq!(doc.parent(&doc.root()), None);
        assert_eq!(find_parent_form(&doc, &script), Some(form));
        assert_eq!(doc.elements_by_name(doc.root(), "missing"), Vec::new());
    }

    #[test]
    fn test_tag_name_is_uppercase() {
        let doc = MemoryDocument::new();
        let form = doc.element(doc.root(), "form", &[]);
        assert_eq!(doc.tag_name(&form), "FORM");
    }

    #[test]
    fn test_form_fields_in_document_order() {
        let doc = MemoryDocument::new();
        let form = doc.element(doc.root(), "form", &[]);
        doc.element(form, "input", &[("name", "amount"), ("value", "10")]);
        let fieldset = doc.element(form, "fieldset", &[]);
        let email = doc.element(fieldset, "input", &[("name", "email")]);
        doc.element(form, "input", &[("type", "submit")]);
        doc.set_value(&email, "a@example.com");

        assert_eq!(
            doc.form_fields(form),
            vec![
                ("amount".to_owned(), "10".to_owned()),
                ("email".to_owned(), "a@example.com".to_owned()),
            ]
        );
    }

    #[test]
    fn test_element_by_id_ignores_detached_nodes() {
        let doc = MemoryDocument::new();
        let detached = doc.create_element("div");
        doc.set_attribute(&detached, "id", "x");
        assert_eq!(doc.element_by_id("x"), None);

        doc.append_child(&doc.root(), &detached);
        assert_eq!(doc.element_by_id("x"), Some(detached));
    }

    #[tokio::test]
    async fn test_dispatch_without_listeners_submits() {
        let doc = MemoryDocument::new();
        let form = doc.element(doc.root(), "form", &[]);

        let prevented = doc.dispatch_submit(form).await;

        assert!(!prevented);
        assert_eq!(doc.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_runs_listeners_in_order() {
        let doc = MemoryDocument::new();
        let form = doc.element(doc.root(), "form", &[]);
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..2 {
            let order = Arc::clone(&order);
            doc.add_submit_listener(
                &form,
                Arc::new(move |event: &SubmitEvent| -> BoxFuture<'static, ()> {
                    event.prevent_default();
                    order.lock().unwrap().push(n);
                    Box::pin(async {})
                }),
            );
        }

        let prevented = doc.dispatch_submit(form).await;

        assert!(prevented);
        assert_eq!(*order.lock().unwrap(), vec![0, 1]);
        assert!(doc.submissions().is_empty());
        assert_eq!(doc.listener_count(form), 2);
    }
}
