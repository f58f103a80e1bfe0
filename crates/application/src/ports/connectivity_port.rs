//! Connectivity signal port
//!
//! Mirrors the browser's `navigator.onLine` flag and its `online`/`offline`
//! events: a current value plus transition notifications.

use std::{fmt, sync::Arc};

/// Callback invoked with the new connectivity state on every transition
pub type ConnectivityCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Port for observing network connectivity
pub trait ConnectivityPort: Send + Sync {
    /// Whether the network is currently considered reachable
    fn is_online(&self) -> bool;

    /// Register for transition events
    ///
    /// The callback fires once per online/offline transition, never for a
    /// repeated signal of the current state. The registration lasts until the
    /// returned [`Subscription`] is unsubscribed or dropped.
    fn subscribe(&self, callback: ConnectivityCallback) -> Subscription;
}

/// Handle that removes a connectivity registration
///
/// Dropping the handle unsubscribes as well.
pub struct Subscription {
    disposer: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Create a subscription that runs `disposer` when released
    pub fn new(disposer: impl FnOnce() + Send + 'static) -> Self {
        Self {
            disposer: Some(Box::new(disposer)),
        }
    }

    /// A subscription with nothing to release
    pub fn noop() -> Self {
        Self { disposer: None }
    }

    /// Remove the registration now
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.disposer.is_some())
            .finish()
    }
}
