//! Save attempt waiting in the offline queue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Draft;
use crate::value_objects::ArticleId;

/// A remote save that could not be delivered yet
///
/// The timestamp is stored as epoch milliseconds, which is also the ordering
/// key for replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedSave {
    /// Entry identifier, used to acknowledge replayed entries
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Article the save targets; `None` for an article not yet created
    #[serde(default)]
    pub identity: Option<ArticleId>,
    /// Full draft content to deliver
    pub draft: Draft,
    /// When the save was queued
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl QueuedSave {
    /// Create a queue entry
    pub fn new(identity: Option<ArticleId>, draft: Draft, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            draft,
            timestamp,
        }
    }

    /// Resolve the article this entry should be delivered to
    ///
    /// Entries queued before the article existed adopt the identity the
    /// session has learned since.
    pub fn target<'a>(&'a self, current: Option<&'a ArticleId>) -> Option<&'a ArticleId> {
        self.identity.as_ref().or(current)
    }
}
