//! Wire types of the post endpoints

use chrono::{DateTime, Utc};
use domain::{ArticleId, Draft, DomainError};
use serde::{Deserialize, Serialize};

/// Publication status accepted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Not visible to readers
    #[default]
    Draft,
    /// Visible to readers
    Published,
}

/// Request body for creating or updating a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub category: Option<u64>,
    pub tags: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub is_top: bool,
    pub is_original: bool,
    pub allow_comment: bool,
    pub is_encrypted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub status: PostStatus,
}

impl From<&Draft> for PostPayload {
    fn from(draft: &Draft) -> Self {
        Self {
            title: draft.title.clone(),
            content: draft.body.clone(),
            excerpt: draft.excerpt.clone(),
            category: draft.category_id,
            tags: draft.tag_ids.clone(),
            cover: draft.cover_url.clone(),
            is_top: draft.flags.pinned,
            is_original: draft.flags.original,
            allow_comment: draft.flags.commentable,
            is_encrypted: draft.flags.encrypted,
            password: draft.password.clone().filter(|_| draft.flags.encrypted),
            status: PostStatus::Draft,
        }
    }
}

/// Part of the post representation returned after a save
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostSaved {
    pub id: u64,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PostSaved {
    /// Identity of the saved post
    ///
    /// A blank slug is treated as absent.
    pub fn identity(&self) -> Result<ArticleId, DomainError> {
        match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => ArticleId::with_slug(self.id, slug),
            _ => ArticleId::new(self.id),
        }
    }
}
