//! Autosave timing configuration.

use application::{ApplicationError, AutosaveSettings, DEFAULT_DEBOUNCE, DEFAULT_INTERVAL};
use serde::Deserialize;

#[allow(clippy::cast_possible_truncation)]
pub(super) const DEFAULT_DEBOUNCE_MS: u64 = DEFAULT_DEBOUNCE.as_millis() as u64;
#[allow(clippy::cast_possible_truncation)]
pub(super) const DEFAULT_INTERVAL_MS: u64 = DEFAULT_INTERVAL.as_millis() as u64;

/// Autosave delays in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AutosaveAppConfig {
    /// Quiet period before an edit is written locally (default: 1000)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Delay between scheduling and issuing a remote save (default: 30000)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

const fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

impl Default for AutosaveAppConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl AutosaveAppConfig {
    pub(super) fn validate(&self) -> Result<(), ApplicationError> {
        if self.debounce_ms == 0 {
            return Err(ApplicationError::Configuration(
                "autosave.debounce_ms must be greater than zero".to_string(),
            ));
        }
        if self.interval_ms == 0 {
            return Err(ApplicationError::Configuration(
                "autosave.interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings for the autosave manager
    pub const fn settings(&self) -> AutosaveSettings {
        AutosaveSettings::from_millis(self.debounce_ms, self.interval_ms)
    }
}
