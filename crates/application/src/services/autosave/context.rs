//! Collaborators shared by every autosave session of an editor

use std::sync::Arc;

use super::settings::AutosaveSettings;
use crate::{
    ports::{ClockPort, KeyValueStorePort},
    services::{LocalDraftStore, OfflineQueue},
};

/// Stores, clock and timings an autosave session runs with
#[derive(Clone)]
pub struct AutosaveContext {
    /// Timer configuration
    pub settings: AutosaveSettings,
    /// Local copies of in-progress drafts
    pub local: LocalDraftStore,
    /// Undelivered remote saves
    pub queue: OfflineQueue,
    /// Time source for local and queue timestamps
    pub clock: Arc<dyn ClockPort>,
}

impl std::fmt::Debug for AutosaveContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutosaveContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl AutosaveContext {
    /// Build the draft store and the offline queue on one key/value store
    pub fn new(
        store: Arc<dyn KeyValueStorePort>,
        clock: Arc<dyn ClockPort>,
        settings: AutosaveSettings,
    ) -> Self {
        Self {
            settings,
            local: LocalDraftStore::new(Arc::clone(&store), Arc::clone(&clock)),
            queue: OfflineQueue::new(store, Arc::clone(&clock)),
            clock,
        }
    }
}
