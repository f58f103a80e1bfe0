//! Key/value substrates for drafts and the offline queue

mod memory_store;
mod redb_store;

pub use memory_store::InMemoryKeyValueStore;
pub use redb_store::RedbKeyValueStore;
