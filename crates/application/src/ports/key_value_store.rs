//! Key/value persistence port
//!
//! Models a browser-style string store (`localStorage`): string keys, string
//! values, no expiry. Implementations may live in memory or on disk.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for string key/value persistence
///
/// Writes may fail (for example when a storage quota is exhausted); callers
/// decide whether such a failure matters.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, ApplicationError>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: String) -> Result<(), ApplicationError>;

    /// Delete the value stored under `key`
    ///
    /// Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), ApplicationError>;
}
