//! Wall clock port

use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

/// Source of the current time
///
/// Injected so that stored timestamps and queue ordering can be controlled
/// in tests.
#[cfg_attr(test, automock)]
pub trait ClockPort: Send + Sync {
    /// Current UTC time
    fn now(&self) -> DateTime<Utc>;
}
