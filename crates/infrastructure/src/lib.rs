//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: redb-backed and
//! in-memory key/value stores, the blog draft remote, the system clock and
//! the connectivity probe. Also owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod stores;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, AutosaveAppConfig, ConnectivityConfig, StorageConfig};
pub use stores::{InMemoryKeyValueStore, RedbKeyValueStore};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
