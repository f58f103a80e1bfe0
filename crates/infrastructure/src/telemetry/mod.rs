//! Logging setup
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`] and a fmt
//! layer. `RUST_LOG` takes precedence over the configured filter.

use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Telemetry errors
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive is malformed
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber is already installed
    #[error("Failed to initialize telemetry: {0}")]
    Init(String),
}

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is not set (default: inkwell=info)
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Output format (default: text)
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_filter() -> String {
    "inkwell=info,application=info,infrastructure=info,integration_blog=warn".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            log_format: LogFormat::default(),
        }
    }
}

impl TelemetryConfig {
    /// Build the filter, preferring `RUST_LOG` when it is set and valid
    ///
    /// # Errors
    ///
    /// Returns an error if the configured directive cannot be parsed.
    pub fn env_filter(&self) -> Result<EnvFilter, TelemetryError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.log_filter)
            .map_err(|e| TelemetryError::InvalidFilter(format!("{}: {e}", self.log_filter)))
    }
}

/// Initialize logging with the given configuration
///
/// Logs go to stderr so command output on stdout stays machine-readable.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = config.env_filter()?;
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.log_format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(format = ?config.log_format, "Telemetry initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_targets_workspace_crates() {
        let config = TelemetryConfig::default();
        assert!(config.log_filter.starts_with("inkwell=info"));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn log_format_deserializes_lowercase() {
        let config: TelemetryConfig = serde_json::from_str(r#"{"log_format":"json"}"#).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_filter, default_log_filter());
    }

    #[test]
    fn malformed_filter_is_rejected() {
        let config = TelemetryConfig {
            log_filter: "inkwell=notalevel".to_string(),
            log_format: LogFormat::Text,
        };
        // RUST_LOG would take precedence; only assert when it is unset
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(matches!(
                config.env_filter(),
                Err(TelemetryError::InvalidFilter(_))
            ));
        }
    }

    #[test]
    fn second_init_fails() {
        let config = TelemetryConfig::default();
        let _ = init_telemetry(&config);
        assert!(matches!(
            init_telemetry(&config),
            Err(TelemetryError::Init(_))
        ));
    }
}
