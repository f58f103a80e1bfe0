//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Reading or writing the local key/value store failed
    ///
    /// Stores built on top of the key/value port log and swallow this error.
    #[error("Local persistence error: {0}")]
    LocalPersistence(String),

    /// The backend did not accept a draft save
    #[error("Remote save failed: {0}")]
    RemoteSave(String),

    /// Replaying a queued save failed
    #[error("Offline queue replay failed: {0}")]
    Drain(String),

    /// The autosave session was already destroyed
    #[error("Autosave session is closed")]
    SessionClosed,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error may succeed on a later attempt
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RemoteSave(_) | Self::Drain(_)
        )
    }
}
