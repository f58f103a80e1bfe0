//! Volatile key/value store

use std::collections::BTreeMap;

use application::{error::ApplicationError, ports::KeyValueStorePort};
use async_trait::async_trait;
use parking_lot::RwLock;

/// Key/value store kept in process memory
///
/// Nothing survives the process. Suits hosts without durable storage and
/// tests.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStorePort for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ApplicationError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ApplicationError> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ApplicationError> {
        self.entries.write().remove(key);
        Ok(())
    }
}
