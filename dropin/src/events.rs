//! Error notification channel.
//!
//! UI components that detect a problem (an invalid field, a failed
//! tokenization) and components that display problems do not know about each
//! other. They meet on an [`ErrorChannel`]: producers call
//! [`ErrorChannel::report`] and [`ErrorChannel::clear`], consumers subscribe
//! with [`ErrorChannel::on`].
//!
//! Delivery is fire-and-forget. Subscribers run synchronously in subscription
//! order and an event with no subscribers is dropped.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// The two event kinds carried by an [`ErrorChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorEventKind {
    /// An error was reported; subscribers receive its code.
    ErrorOccurred,
    /// Any displayed error should be dismissed.
    ErrorCleared,
}

impl ErrorEventKind {
    /// The event name as used by the widget's UI components.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ErrorOccurred => "errorOccurred",
            Self::ErrorCleared => "errorCleared",
        }
    }
}

impl fmt::Display for ErrorEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorEvent {
    /// An error occurred, identified by a machine-readable code.
    ErrorOccurred(String),
    /// The current error was cleared.
    ErrorCleared,
}

impl ErrorEvent {
    /// Returns the kind of this event.
    #[must_use]
    pub const fn kind(&self) -> ErrorEventKind {
        match self {
            Self::ErrorOccurred(_) => ErrorEventKind::ErrorOccurred,
            Self::ErrorCleared => ErrorEventKind::ErrorCleared,
        }
    }

    /// Returns the error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::ErrorOccurred(code) => Some(code),
            Self::ErrorCleared => None,
        }
    }
}

/// Handle returned by [`ErrorChannel::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Subscriber callback.
pub type ErrorCallback = Arc<dyn Fn(&ErrorEvent) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    kind: ErrorEventKind,
    callback: ErrorCallback,
}

#[derive(Default)]
struct Inner {
    next_id: AtomicU64,
    subscriptions: Mutex<Vec<Subscription>>,
}

/// Publish/subscribe channel for error display.
///
/// Cloning yields another handle to the same channel.
#[derive(Clone, Default)]
pub struct ErrorChannel {
    inner: Arc<Inner>,
}

impl Debug for ErrorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorChannel")
            .field(
                "subscriptions",
                &format!("[{} subscriptions]", self.lock().len()),
            )
            .finish()
    }
}

impl ErrorChannel {
    /// Creates a channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Subscription>> {
        self.inner
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribes `callback` to events of `kind`.
    pub fn on<F>(&self, kind: ErrorEventKind, callback: F) -> SubscriptionId
    where
        F: Fn(&ErrorEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push(Subscription {
            id,
            kind,
            callback: Arc::new(callback),
        });
        id
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.lock();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    /// Returns the number of subscribers for `kind`.
    #[must_use]
    pub fn subscriber_count(&self, kind: ErrorEventKind) -> usize {
        self.lock().iter().filter(|s| s.kind == kind).count()
    }

    /// Notifies `errorOccurred` subscribers with `code`.
    pub fn report(&self, code: impl Into<String>) {
        self.emit(&ErrorEvent::ErrorOccurred(code.into()));
    }

    /// Notifies `errorCleared` subscribers.
    pub fn clear(&self) {
        self.emit(&ErrorEvent::ErrorCleared);
    }

    fn emit(&self, event: &ErrorEvent) {
        let kind = event.kind();
        // Snapshot so callbacks may subscribe or unsubscribe while we iterate.
        let callbacks: Vec<ErrorCallback> = self
            .lock()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| Arc::clone(&s.callback))
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(channel: &ErrorChannel, kind: ErrorEventKind) -> Arc<Mutex<Vec<ErrorEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        channel.on(kind, move |event| sink.lock().unwrap().push(event.clone()));
        seen
    }

    #[test]
    fn test_report_reaches_each_subscriber_once() {
        let channel = ErrorChannel::new();
        let first = recorder(&channel, ErrorEventKind::ErrorOccurred);
        let second = recorder(&channel, ErrorEventKind::ErrorOccurred);
        let cleared = recorder(&channel, ErrorEventKind::ErrorCleared);

        channel.report("hostedFieldsFieldsInvalidError");

        let expected = vec![ErrorEvent::ErrorOccurred(
            "hostedFieldsFieldsInvalidError".into(),
        )];
        assert_eq!(*first.lock().unwrap(), expected);
        assert_eq!(*second.lock().unwrap(), expected);
        assert!(cleared.lock().unwrap().is_empty());
    }

    #[test]
    fn test_clear_reaches_each_subscriber_once() {
        let channel = ErrorChannel::new();
        let occurred = recorder(&channel, ErrorEventKind::ErrorOccurred);
        let cleared = recorder(&channel, ErrorEventKind::ErrorCleared);

        channel.clear();

        assert!(occurred.lock().unwrap().is_empty());
        assert_eq!(*cleared.lock().unwrap(), vec![ErrorEvent::ErrorCleared]);
    }

    #[test]
    fn test_subscribers_run_in_subscription_order() {
        let channel = ErrorChannel::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let order = Arc::clone(&order);
            channel.on(ErrorEventKind::ErrorOccurred, move |_| {
                order.lock().unwrap().push(n);
            });
        }

        channel.report("x");

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_off_removes_subscription() {
        let channel = ErrorChannel::new();
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        let id = channel.on(ErrorEventKind::ErrorCleared, move |_| {
            *sink.lock().unwrap() += 1;
        });

        assert!(channel.off(id));
        assert!(!channel.off(id));
        channel.clear();

        assert_eq!(*seen.lock().unwrap(), 0);
        assert_eq!(channel.subscriber_count(ErrorEventKind::ErrorCleared), 0);
    }

    #[test]
    fn test_events_without_subscribers_are_dropped() {
        let channel = ErrorChannel::new();
        channel.report("lost");
        let late = recorder(&channel, ErrorEventKind::ErrorOccurred);
        assert!(late.lock().unwrap().is_empty());
    }

    #[test]
    fn test_clones_share_subscribers() {
        let channel = ErrorChannel::new();
        let seen = recorder(&channel, ErrorEventKind::ErrorOccurred);

        channel.clone().report("shared");

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_callback_may_unsubscribe_itself() {
        let channel = ErrorChannel::new();
        let handle = channel.clone();
        let id = Arc::new(Mutex::new(None));
        let id_slot = Arc::clone(&id);
        let registered = channel.on(ErrorEventKind::ErrorOccurred, move |_| {
            if let Some(id) = *id_slot.lock().unwrap() {
                handle.off(id);
            }
        });
        *id.lock().unwrap() = Some(registered);

        channel.report("once");

        assert_eq!(channel.subscriber_count(ErrorEventKind::ErrorOccurred), 0);
    }

    #[test]
    fn test_event_accessors() {
        let event = ErrorEvent::ErrorOccurred("code".into());
        assert_eq!(event.kind(), ErrorEventKind::ErrorOccurred);
        assert_eq!(event.code(), Some("code"));
        assert_eq!(ErrorEvent::ErrorCleared.code(), None);
        assert_eq!(ErrorEventKind::ErrorCleared.to_string(), "errorCleared");
    }
}
