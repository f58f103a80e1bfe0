//! Redb key/value store
//!
//! Durable substrate for local drafts and the offline queue. Values are the
//! JSON strings produced by the application layer, stored as-is.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use application::{error::ApplicationError, ports::KeyValueStorePort};
use async_trait::async_trait;
use redb::{Database, DatabaseError, ReadableDatabase, ReadableTable, TableDefinition};
use tracing::{debug, instrument, warn};

/// Table holding every entry
const ENTRIES_TABLE: TableDefinition<&str, &str> = TableDefinition::new("entries");

/// Redb-backed key/value store
///
/// # Auto-Recovery
///
/// A database file that cannot be opened is deleted and recreated, so a
/// corrupt file costs the stored drafts but never blocks the editor. A file
/// held open by another handle is reported instead.
pub struct RedbKeyValueStore {
    db: Arc<Database>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for RedbKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbKeyValueStore")
            .field("db", &"<Database>")
            .field("path", &self.path)
            .finish()
    }
}

fn persistence_error(context: &str, e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::LocalPersistence(format!("{context}: {e}"))
}

impl RedbKeyValueStore {
    /// Open or create the store at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened after recreating it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ApplicationError> {
        let path_buf = path.as_ref().to_path_buf();

        if let Some(parent) = path_buf.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| persistence_error("Failed to create storage directory", e))?;
        }

        let db = match Database::create(&path_buf) {
            Ok(db) => db,
            Err(DatabaseError::DatabaseAlreadyOpen) => {
                return Err(persistence_error(
                    "Store is in use",
                    path_buf.display(),
                ));
            },
            Err(e) => {
                warn!(
                    path = %path_buf.display(),
                    error = %e,
                    "Store corrupted or incompatible, recreating"
                );
                if path_buf.exists() {
                    fs::remove_file(&path_buf)
                        .map_err(|e| persistence_error("Failed to remove corrupted store", e))?;
                }
                Database::create(&path_buf)
                    .map_err(|e| persistence_error("Failed to create store", e))?
            },
        };

        Self::ensure_table(&db)?;
        debug!(path = %path_buf.display(), "Key/value store opened");

        Ok(Self {
            db: Arc::new(db),
            path: Some(path_buf),
        })
    }

    /// Create a store that lives in memory only
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory backend cannot be initialized.
    pub fn in_memory() -> Result<Self, ApplicationError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| persistence_error("Failed to create in-memory store", e))?;
        Self::ensure_table(&db)?;

        Ok(Self {
            db: Arc::new(db),
            path: None,
        })
    }

    /// Location of the database file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn ensure_table(db: &Database) -> Result<(), ApplicationError> {
        let write_txn = db
            .begin_write()
            .map_err(|e| persistence_error("Failed to begin write transaction", e))?;
        {
            // Opening the table creates it
            let _ = write_txn
                .open_table(ENTRIES_TABLE)
                .map_err(|e| persistence_error("Failed to open entries table", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| persistence_error("Failed to commit transaction", e))
    }

    /// All keys starting with `prefix`, in key order
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read.
    #[instrument(skip(self), level = "debug")]
    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ApplicationError> {
        let db = Arc::clone(&self.db);
        let prefix = prefix.to_string();

        tokio::task::spawn_blocking(move || {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(ENTRIES_TABLE)?;
            let keys = table
                .iter()?
                .filter_map(|result| {
                    result.ok().and_then(|(key, _)| {
                        let key = key.value();
                        key.starts_with(&prefix).then(|| key.to_string())
                    })
                })
                .collect();
            Ok::<_, redb::Error>(keys)
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Task join error: {e}")))?
        .map_err(|e| persistence_error("Redb iteration error", e))
    }
}

#[async_trait]
impl KeyValueStorePort for RedbKeyValueStore {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &str) -> Result<Option<String>, ApplicationError> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();

        // Redb operations are blocking
        tokio::task::spawn_blocking(move || {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(ENTRIES_TABLE)?;
            Ok::<_, redb::Error>(table.get(key.as_str())?.map(|v| v.value().to_string()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Task join error: {e}")))?
        .map_err(|e| persistence_error("Redb get error", e))
    }

    #[instrument(skip(self, value), level = "debug", fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: String) -> Result<(), ApplicationError> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();

        tokio::task::spawn_blocking(move || {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(ENTRIES_TABLE)?;
                table.insert(key.as_str(), value.as_str())?;
            }
            write_txn.commit()?;
            Ok::<_, redb::Error>(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Task join error: {e}")))?
        .map_err(|e| persistence_error("Redb insert error", e))
    }

    #[instrument(skip(self), level = "debug")]
    async fn remove(&self, key: &str) -> Result<(), ApplicationError> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();

        tokio::task::spawn_blocking(move || {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(ENTRIES_TABLE)?;
                table.remove(key.as_str())?;
            }
            write_txn.commit()?;
            Ok::<_, redb::Error>(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Task join error: {e}")))?
        .map_err(|e| persistence_error("Redb remove error", e))
    }
}
