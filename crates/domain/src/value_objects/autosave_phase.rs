//! Observable phase of an autosave session

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of the autosave state machine
///
/// The phase is derived from the session state; when several conditions hold
/// at once the most significant one wins, in declaration order from
/// `Destroyed` down to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AutosavePhase {
    /// Nothing pending
    #[default]
    Idle,
    /// Local copy written, waiting for edits to settle
    Debouncing,
    /// Remote save timer armed
    ScheduledRemote,
    /// Remote request in flight
    Saving,
    /// Network down, saves are routed to the offline queue
    Offline,
    /// Replaying queued saves
    Draining,
    /// Session torn down
    Destroyed,
}

impl AutosavePhase {
    /// Whether a remote request is currently running
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Saving | Self::Draining)
    }

    /// Short machine-friendly label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Debouncing => "debouncing",
            Self::ScheduledRemote => "scheduled_remote",
            Self::Saving => "saving",
            Self::Offline => "offline",
            Self::Draining => "draining",
            Self::Destroyed => "destroyed",
        }
    }
}

impl fmt::Display for AutosavePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
