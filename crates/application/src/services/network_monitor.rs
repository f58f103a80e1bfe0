//! In-process connectivity monitor
//!
//! Holds the current online flag and fans transitions out to subscribers.
//! Hosts feed it from whatever signal they have (a reachability probe, an
//! OS event); the autosave manager only sees it through [`ConnectivityPort`].

use std::{
    collections::BTreeMap,
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::ports::{ConnectivityCallback, ConnectivityPort, Subscription};

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    callbacks: Mutex<BTreeMap<u64, ConnectivityCallback>>,
}

/// Connectivity source with transition notifications
pub struct NetworkMonitor {
    online: AtomicBool,
    registry: Arc<Registry>,
}

impl std::fmt::Debug for NetworkMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkMonitor")
            .field("online", &self.online.load(Ordering::SeqCst))
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NetworkMonitor {
    /// Create a monitor with the given initial state
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
            registry: Arc::new(Registry::default()),
        }
    }

    /// Report the current connectivity state
    ///
    /// Subscribers are notified only when the state actually changes.
    /// Returns whether a transition happened.
    pub fn set_online(&self, online: bool) -> bool {
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous == online {
            return false;
        }

        info!(online, "Connectivity changed");

        // Snapshot so callbacks may subscribe or unsubscribe re-entrantly
        let callbacks: Vec<ConnectivityCallback> =
            self.registry.callbacks.lock().values().cloned().collect();
        for callback in callbacks {
            callback(online);
        }
        true
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.registry.callbacks.lock().len()
    }
}

impl ConnectivityPort for NetworkMonitor {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn subscribe(&self, callback: ConnectivityCallback) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.callbacks.lock().insert(id, callback);
        debug!(subscription = id, "Connectivity subscriber added");

        let registry: Weak<Registry> = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.callbacks.lock().remove(&id);
                debug!(subscription = id, "Connectivity subscriber removed");
            }
        })
    }
}
