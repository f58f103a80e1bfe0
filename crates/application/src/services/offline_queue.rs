//! Offline queue of undelivered remote saves
//!
//! Saves that could not reach the backend are appended to a single JSON array
//! in the key/value store and replayed oldest-first once the backend is
//! reachable again.
//!
//! # Replay contract
//!
//! ```text
//!   enqueue ──> [ t=1 | t=2 | t=3 ] ──drain()──> replay oldest-first
//!                                                   │
//!                 acknowledge(flushed ids) <────────┘ stop at first failure
//! ```
//!
//! `drain` only reads. Entries leave the queue through `acknowledge` (or
//! `clear`), so an entry appended while a replay is running survives it.

use std::sync::Arc;

use domain::{ArticleId, Draft, QueuedSave};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::ports::{ClockPort, KeyValueStorePort};

/// Key under which the queue array is persisted
pub const OFFLINE_QUEUE_KEY: &str = "autosave_offline_queue";

/// Durable FIFO of pending remote saves
///
/// Clones share the same write lock, so concurrent enqueue and acknowledge
/// calls from one process never lose entries.
#[derive(Clone)]
pub struct OfflineQueue {
    store: Arc<dyn KeyValueStorePort>,
    clock: Arc<dyn ClockPort>,
    write_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for OfflineQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineQueue")
            .field("key", &OFFLINE_QUEUE_KEY)
            .finish_non_exhaustive()
    }
}

impl OfflineQueue {
    /// Create a queue on top of a key/value port
    pub fn new(store: Arc<dyn KeyValueStorePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            store,
            clock,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Append a save attempt stamped with the current time
    ///
    /// The entry is returned even if persisting it failed.
    #[instrument(skip(self, draft), fields(identity = ?identity.as_ref().map(ArticleId::value)))]
    pub async fn enqueue(&self, identity: Option<ArticleId>, draft: Draft) -> QueuedSave {
        let entry = QueuedSave::new(identity, draft, self.clock.now());

        let _guard = self.write_lock.lock().await;
        let mut entries = self.read().await;
        entries.push(entry.clone());
        self.write(&entries).await;

        debug!(queued = entries.len(), entry_id = %entry.id, "Save queued for later delivery");
        entry
    }

    /// All queued entries ordered for replay
    ///
    /// Sorted ascending by timestamp; entries with equal timestamps keep
    /// their insertion order. Waits for running appends; the queue itself is
    /// left untouched.
    pub async fn drain(&self) -> Vec<QueuedSave> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read().await;
        entries.sort_by_key(|entry| entry.timestamp);
        entries
    }

    /// Remove every entry
    #[instrument(skip(self))]
    pub async fn clear(&self) {
        let _guard = self.write_lock.lock().await;
        if let Err(e) = self.store.remove(OFFLINE_QUEUE_KEY).await {
            warn!(error = %e, "Failed to clear offline queue");
        }
    }

    /// Remove the given entries, keeping everything else in order
    ///
    /// Removing the last entry deletes the persisted key, the same as
    /// [`clear`](Self::clear).
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn acknowledge(&self, ids: &[Uuid]) {
        if ids.is_empty() {
            return;
        }

        let _guard = self.write_lock.lock().await;
        let mut entries = self.read().await;
        let before = entries.len();
        entries.retain(|entry| !ids.contains(&entry.id));

        if entries.is_empty() {
            if let Err(e) = self.store.remove(OFFLINE_QUEUE_KEY).await {
                warn!(error = %e, "Failed to clear offline queue");
            }
        } else if entries.len() != before {
            self.write(&entries).await;
        }

        debug!(
            removed = before - entries.len(),
            remaining = entries.len(),
            "Acknowledged queued saves"
        );
    }

    /// Number of queued entries
    pub async fn len(&self) -> usize {
        self.read().await.len()
    }

    /// Whether nothing is queued
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn read(&self) -> Vec<QueuedSave> {
        let raw = match self.store.get(OFFLINE_QUEUE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read offline queue");
                return Vec::new();
            },
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Offline queue is corrupt, treating as empty");
            Vec::new()
        })
    }

    async fn write(&self, entries: &[QueuedSave]) {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize offline queue");
                return;
            },
        };

        if let Err(e) = self.store.set(OFFLINE_QUEUE_KEY, json).await {
            warn!(error = %e, "Failed to persist offline queue");
        }
    }
}
