//! Article draft being edited
//!
//! A draft is always the full editable content of an article, never a delta,
//! so any two saves of the same article resolve as last-write-wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::DomainError;

/// Maximum title length accepted by the backend
pub const MAX_TITLE_CHARS: u64 = 200;
/// Maximum excerpt length accepted by the backend
pub const MAX_EXCERPT_CHARS: u64 = 500;
/// Maximum access password length accepted by the backend
pub const MAX_PASSWORD_CHARS: u64 = 128;

/// Publication flags of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftFlags {
    /// Pinned to the top of listings
    #[serde(default)]
    pub pinned: bool,
    /// Original work rather than a repost
    #[serde(default = "default_true")]
    pub original: bool,
    /// Comments are allowed
    #[serde(default = "default_true")]
    pub commentable: bool,
    /// Content is password protected
    #[serde(default)]
    pub encrypted: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for DraftFlags {
    fn default() -> Self {
        Self {
            pinned: false,
            original: true,
            commentable: true,
            encrypted: false,
        }
    }
}

/// In-progress representation of an article
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
pub struct Draft {
    /// Article title
    #[validate(length(max = 200))]
    pub title: String,
    /// Markdown body
    pub body: String,
    /// Optional summary shown in listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub excerpt: Option<String>,
    /// Category the article is filed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    /// Attached tags
    #[serde(default)]
    pub tag_ids: Vec<u64>,
    /// Cover image location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Publication flags
    #[serde(default)]
    pub flags: DraftFlags,
    /// Access password for encrypted articles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 128))]
    pub password: Option<String>,
    /// Last modification time known to the editor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Draft {
    /// Create a draft with a title and body and default flags
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Set the excerpt
    #[must_use]
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Set the category
    #[must_use]
    pub const fn with_category(mut self, category_id: u64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Set the tags
    #[must_use]
    pub fn with_tags(mut self, tag_ids: impl IntoIterator<Item = u64>) -> Self {
        self.tag_ids = tag_ids.into_iter().collect();
        self
    }

    /// Set the cover image
    #[must_use]
    pub fn with_cover(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = Some(cover_url.into());
        self
    }

    /// Replace the publication flags
    #[must_use]
    pub const fn with_flags(mut self, flags: DraftFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Mark the article as encrypted with the given access password
    #[must_use]
    pub fn encrypted_with(mut self, password: impl Into<String>) -> Self {
        self.flags.encrypted = true;
        self.password = Some(password.into());
        self
    }

    /// Check the draft against the backend's field constraints
    ///
    /// Autosave never calls this; it is meant for explicit user saves so that
    /// the user sees the problem before a request is made.
    ///
    /// # Errors
    /// Returns a validation error describing the first violated constraint.
    pub fn ensure_valid(&self) -> Result<(), DomainError> {
        Validate::validate(self).map_err(|e| DomainError::ValidationError(e.to_string()))?;

        if self.flags.encrypted && self.password.as_deref().is_none_or(str::is_empty) {
            return Err(DomainError::ValidationError(
                "encrypted articles require a password".to_string(),
            ));
        }
        Ok(())
    }
}
