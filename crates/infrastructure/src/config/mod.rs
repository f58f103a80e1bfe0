//! Application configuration
//!
//! Split into focused sub-modules:
//! - `autosave`: debounce and remote-save delays
//! - `storage`: on-disk key/value store location
//! - `connectivity`: reachability probe settings
//!
//! The `api` section is the blog client's own [`BlogApiConfig`] and the
//! `telemetry` section is [`TelemetryConfig`].

mod autosave;
mod connectivity;
mod storage;

use std::path::Path;

use application::ApplicationError;
use integration_blog::BlogApiConfig;
use serde::Deserialize;
use tracing::debug;

pub use autosave::AutosaveAppConfig;
pub use connectivity::ConnectivityConfig;
pub use storage::StorageConfig;

use crate::telemetry::TelemetryConfig;

/// Prefix of environment overrides, e.g. `INKWELL_API__BASE_URL`
pub const ENV_PREFIX: &str = "INKWELL";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Autosave timing
    #[serde(default)]
    pub autosave: AutosaveAppConfig,

    /// Blog backend
    #[serde(default)]
    pub api: BlogApiConfig,

    /// Local persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Connectivity probing
    #[serde(default)]
    pub connectivity: ConnectivityConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config").required(false))
    }

    /// Load configuration from an explicit file, still honoring the environment
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .set_default("autosave.debounce_ms", autosave::DEFAULT_DEBOUNCE_MS)?
            .set_default("autosave.interval_ms", autosave::DEFAULT_INTERVAL_MS)?
            .add_source(file)
            // Override with environment variables (e.g., INKWELL_AUTOSAVE__DEBOUNCE_MS)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        debug!(storage = %loaded.storage.path.display(), "Configuration loaded");
        Ok(loaded)
    }

    /// Reject settings the engine cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Configuration`] naming the first offending
    /// setting.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.autosave.validate()?;

        if self.api.base_url.trim().is_empty() {
            return Err(ApplicationError::Configuration(
                "api.base_url must not be empty".to_string(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ApplicationError::Configuration(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }

        self.connectivity.validate()?;
        self.storage.validate()
    }
}
