//! Locally persisted draft snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Draft;

/// A draft plus the time it was written to local storage
///
/// Serialized flat: the draft's fields and a `saved_at` field side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDraft {
    /// The saved content
    #[serde(flatten)]
    pub draft: Draft,
    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,
}

impl StoredDraft {
    /// Stamp a draft with its save time
    pub const fn new(draft: Draft, saved_at: DateTime<Utc>) -> Self {
        Self { draft, saved_at }
    }

    /// Give up the timestamp and keep the draft
    pub fn into_draft(self) -> Draft {
        self.draft
    }
}
