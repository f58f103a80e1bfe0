//! Local draft store
//!
//! Keeps the latest draft of each article in the key/value store so that an
//! editor session interrupted by a crash, a closed tab or a lost connection
//! can be recovered. Writes are best effort: failures are logged and never
//! reach the caller.

use std::sync::Arc;

use domain::{ArticleId, Draft, StoredDraft};
use tracing::{debug, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{ClockPort, KeyValueStorePort},
};

/// Prefix of every local draft key
pub const DRAFT_KEY_PREFIX: &str = "post_draft_";

/// Key suffix used for an article the backend has not created yet
pub const NEW_DRAFT_SUFFIX: &str = "new";

/// Storage key for the draft of `identity`
pub fn draft_storage_key(identity: Option<&ArticleId>) -> String {
    identity.map_or_else(
        || format!("{DRAFT_KEY_PREFIX}{NEW_DRAFT_SUFFIX}"),
        |id| format!("{DRAFT_KEY_PREFIX}{}", id.value()),
    )
}

/// Best-effort local persistence of the latest draft per article
#[derive(Clone)]
pub struct LocalDraftStore {
    store: Arc<dyn KeyValueStorePort>,
    clock: Arc<dyn ClockPort>,
}

impl std::fmt::Debug for LocalDraftStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalDraftStore").finish_non_exhaustive()
    }
}

impl LocalDraftStore {
    /// Create a store on top of a key/value port
    pub fn new(store: Arc<dyn KeyValueStorePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    /// Write `draft` stamped with the current time, replacing any earlier copy
    #[instrument(skip(self, draft), fields(key = %draft_storage_key(identity)))]
    pub async fn save(&self, identity: Option<&ArticleId>, draft: &Draft) {
        let key = draft_storage_key(identity);
        let stored = StoredDraft::new(draft.clone(), self.clock.now());

        let result = match serde_json::to_string(&stored) {
            Ok(json) => self.store.set(&key, json).await,
            Err(e) => Err(ApplicationError::LocalPersistence(format!(
                "Draft serialization error: {e}"
            ))),
        };

        match result {
            Ok(()) => debug!("Draft saved locally"),
            Err(e) => warn!(error = %e, "Failed to save draft locally"),
        }
    }

    /// Read the stored draft
    ///
    /// Missing, unreadable and corrupt entries all yield `None`.
    #[instrument(skip(self), fields(key = %draft_storage_key(identity)))]
    pub async fn load(&self, identity: Option<&ArticleId>) -> Option<StoredDraft> {
        let key = draft_storage_key(identity);

        let raw = match self.store.get(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read local draft");
                return None;
            },
        };

        match serde_json::from_str::<StoredDraft>(&raw) {
            Ok(stored) => Some(stored),
            Err(e) => {
                warn!(error = %e, "Ignoring corrupt local draft");
                None
            },
        }
    }

    /// Delete the stored draft; deleting a missing draft is a no-op
    #[instrument(skip(self), fields(key = %draft_storage_key(identity)))]
    pub async fn remove(&self, identity: Option<&ArticleId>) {
        let key = draft_storage_key(identity);
        match self.store.remove(&key).await {
            Ok(()) => debug!("Local draft removed"),
            Err(e) => warn!(error = %e, "Failed to remove local draft"),
        }
    }

    /// Whether [`load`](Self::load) would return a draft
    pub async fn exists(&self, identity: Option<&ArticleId>) -> bool {
        self.load(identity).await.is_some()
    }
}
