//! Acknowledgement returned by the backend after a draft save

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ArticleId;

/// Outcome of a successful remote save
///
/// Carries the identity the backend assigned (or confirmed) and the
/// server-side modification time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    /// Identity of the saved article
    pub identity: ArticleId,
    /// Server-side modification time
    pub updated_at: DateTime<Utc>,
}

impl SaveReceipt {
    /// Create a receipt
    pub const fn new(identity: ArticleId, updated_at: DateTime<Utc>) -> Self {
        Self {
            identity,
            updated_at,
        }
    }
}
