//! Connectivity probe configuration.

use std::time::Duration;

use application::ApplicationError;
use serde::Deserialize;

use super::default_true;

/// Backend reachability probing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ConnectivityConfig {
    /// Probe the backend to derive the online signal (default: true)
    #[serde(default = "default_true")]
    pub probe_enabled: bool,

    /// Seconds between probes (default: 15)
    #[serde(default = "default_probe_interval")]
    pub probe_interval_secs: u64,
}

const fn default_probe_interval() -> u64 {
    15
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_enabled: true,
            probe_interval_secs: default_probe_interval(),
        }
    }
}

impl ConnectivityConfig {
    /// Probe period
    pub const fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }

    pub(super) fn validate(&self) -> Result<(), ApplicationError> {
        if self.probe_enabled && self.probe_interval_secs == 0 {
            return Err(ApplicationError::Configuration(
                "connectivity.probe_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
