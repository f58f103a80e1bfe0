//! Blog draft adapter - Implements DraftRemotePort using integration_blog

use std::sync::Arc;

use application::{error::ApplicationError, ports::DraftRemotePort};
use async_trait::async_trait;
use chrono::Utc;
use domain::{ArticleId, Draft, SaveReceipt};
use integration_blog::{BlogApiConfig, BlogApiError, BlogClient, HttpBlogClient, PostPayload};
use tracing::{debug, instrument};

/// Adapter saving drafts through the blog REST API
pub struct BlogDraftRemoteAdapter {
    client: Arc<dyn BlogClient>,
}

impl std::fmt::Debug for BlogDraftRemoteAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogDraftRemoteAdapter")
            .field("client", &"BlogClient")
            .finish()
    }
}

impl BlogDraftRemoteAdapter {
    /// Create an adapter with an HTTP client built from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: BlogApiConfig) -> Result<Self, ApplicationError> {
        let client = HttpBlogClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Create an adapter around an existing client
    pub fn new(client: Arc<dyn BlogClient>) -> Self {
        Self { client }
    }

    /// Underlying client, shared with the connectivity probe
    pub fn client(&self) -> Arc<dyn BlogClient> {
        Arc::clone(&self.client)
    }

    /// Every client failure is a failed remote save to the autosave engine
    fn map_error(err: BlogApiError) -> ApplicationError {
        ApplicationError::RemoteSave(err.to_string())
    }
}

#[async_trait]
impl DraftRemotePort for BlogDraftRemoteAdapter {
    #[instrument(skip(self, draft), fields(identity = ?identity.map(ArticleId::value)))]
    async fn save(
        &self,
        identity: Option<&ArticleId>,
        draft: &Draft,
    ) -> Result<SaveReceipt, ApplicationError> {
        let payload = PostPayload::from(draft);

        let saved = match identity {
            Some(id) => self.client.update_draft(&id.path_segment(), &payload).await,
            None => self.client.create_draft(&payload).await,
        }
        .map_err(Self::map_error)?;

        let identity = saved
            .identity()
            .map_err(|e| ApplicationError::RemoteSave(format!("Unusable post identity: {e}")))?;
        debug!(article = %identity, "Draft accepted by backend");

        Ok(SaveReceipt::new(
            identity,
            saved.updated_at.unwrap_or_else(Utc::now),
        ))
    }
}
