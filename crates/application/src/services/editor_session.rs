//! Editor session lifecycle
//!
//! When the editor opens an article it first checks for a local copy left
//! behind by an earlier session and offers to restore it. After that the
//! session hands over to an [`AutosaveManager`].

use std::sync::Arc;

use domain::{ArticleId, Draft, StoredDraft};
use tracing::{info, instrument};

use super::autosave::{AutosaveContext, AutosaveManager};
use crate::{
    error::ApplicationError,
    ports::{ConnectivityPort, DraftRemotePort},
};

/// Entry point of the editor for one key/value store
#[derive(Debug, Clone)]
pub struct EditorSession {
    ctx: AutosaveContext,
}

impl EditorSession {
    pub fn new(ctx: AutosaveContext) -> Self {
        Self { ctx }
    }

    /// Shared stores and settings
    pub const fn context(&self) -> &AutosaveContext {
        &self.ctx
    }

    /// Whether a local copy exists for the article
    pub async fn has_unsaved_draft(&self, identity: Option<&ArticleId>) -> bool {
        self.ctx.local.exists(identity).await
    }

    /// Local copy to offer for recovery when the editor opens
    pub async fn recovery_offer(&self, identity: Option<&ArticleId>) -> Option<StoredDraft> {
        self.ctx.local.load(identity).await
    }

    /// Accept the recovery offer
    ///
    /// The local copy stays in place until a manual save or a discard.
    #[instrument(skip(self))]
    pub async fn restore(&self, identity: Option<&ArticleId>) -> Option<Draft> {
        let stored = self.ctx.local.load(identity).await?;
        info!(saved_at = %stored.saved_at, "Restoring local draft");
        Some(stored.into_draft())
    }

    /// Reject the recovery offer and delete the local copy
    #[instrument(skip(self))]
    pub async fn discard(&self, identity: Option<&ArticleId>) {
        self.ctx.local.remove(identity).await;
        info!("Local draft discarded");
    }

    /// Start autosaving the article
    ///
    /// # Errors
    /// See [`AutosaveManager::start`].
    pub fn start(
        &self,
        identity: Option<ArticleId>,
        remote: Arc<dyn DraftRemotePort>,
        connectivity: &dyn ConnectivityPort,
    ) -> Result<AutosaveManager, ApplicationError> {
        AutosaveManager::start(self.ctx.clone(), identity, remote, connectivity)
    }
}
