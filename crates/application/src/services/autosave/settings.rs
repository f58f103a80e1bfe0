//! Autosave timing settings

use std::time::Duration;

/// Default quiet period before an edit is scheduled for a remote save
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1_000);

/// Default delay between scheduling and issuing a remote save
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(30_000);

/// Timer configuration for an autosave session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveSettings {
    /// Edits arriving within this window collapse into one
    pub debounce: Duration,
    /// Delay of the scheduled remote save
    pub interval: Duration,
}

impl Default for AutosaveSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl AutosaveSettings {
    /// Build settings from millisecond values
    pub const fn from_millis(debounce_ms: u64, interval_ms: u64) -> Self {
        Self {
            debounce: Duration::from_millis(debounce_ms),
            interval: Duration::from_millis(interval_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor_cadence() {
        let settings = AutosaveSettings::default();
        assert_eq!(settings.debounce, Duration::from_secs(1));
        assert_eq!(settings.interval, Duration::from_secs(30));
    }

    #[test]
    fn from_millis() {
        let settings = AutosaveSettings::from_millis(250, 5_000);
        assert_eq!(settings.debounce, Duration::from_millis(250));
        assert_eq!(settings.interval, Duration::from_secs(5));
    }
}
