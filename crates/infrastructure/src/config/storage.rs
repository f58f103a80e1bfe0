//! Local persistence configuration.

use std::path::PathBuf;

use application::ApplicationError;
use serde::Deserialize;

/// Where drafts and the offline queue are kept
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Path of the redb database file (default: inkwell.redb)
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_path() -> PathBuf {
    PathBuf::from("inkwell.redb")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl StorageConfig {
    pub(super) fn validate(&self) -> Result<(), ApplicationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ApplicationError::Configuration(
                "storage.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
