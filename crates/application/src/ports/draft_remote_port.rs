//! Remote draft persistence port
//!
//! The backend either creates a new article from a draft or updates an
//! existing one; which of the two happens depends only on whether an identity
//! is known.

use async_trait::async_trait;
use domain::{ArticleId, Draft, SaveReceipt};

use crate::error::ApplicationError;

/// Port for saving drafts to the blog backend
#[async_trait]
pub trait DraftRemotePort: Send + Sync {
    /// Save a draft remotely
    ///
    /// With `identity == None` a new article is created and its identity is
    /// returned in the receipt; otherwise the identified article is updated.
    ///
    /// # Errors
    /// Any transport or server problem is reported as
    /// [`ApplicationError::RemoteSave`]; callers do not distinguish causes.
    async fn save(
        &self,
        identity: Option<&ArticleId>,
        draft: &Draft,
    ) -> Result<SaveReceipt, ApplicationError>;
}
