//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Article identifier is not a positive integer
    #[error("Invalid article id: {0}")]
    InvalidArticleId(String),

    /// Article slug is empty or not usable as a path segment
    #[error("Invalid article slug: {0}")]
    InvalidSlug(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
