//! Article identifier assigned by the blog backend
//!
//! An article has a numeric primary key and a slug. The backend addresses
//! updates by slug, while local storage keys use the numeric id, so equality
//! and hashing only consider the id.
//!
//! # Examples
//!
//! ```
//! use domain::ArticleId;
//!
//! let id = ArticleId::with_slug(42, "hello-world").unwrap();
//! assert_eq!(id.value(), 42);
//! assert_eq!(id.path_segment(), "hello-world");
//!
//! // The slug does not take part in equality
//! assert_eq!(id, ArticleId::new(42).unwrap());
//!
//! // Zero is never a valid backend id
//! assert!(ArticleId::new(0).is_err());
//! ```

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Backend identity of an article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleId {
    id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
}

impl ArticleId {
    /// Create an identifier from the numeric id only
    ///
    /// # Errors
    /// Returns an error if `id` is zero.
    pub fn new(id: u64) -> Result<Self, DomainError> {
        if id == 0 {
            return Err(DomainError::InvalidArticleId(id.to_string()));
        }
        Ok(Self { id, slug: None })
    }

    /// Create an identifier carrying both the numeric id and the slug
    ///
    /// # Errors
    /// Returns an error if `id` is zero or the slug is blank or contains `/`.
    pub fn with_slug(id: u64, slug: impl Into<String>) -> Result<Self, DomainError> {
        let slug = slug.into().trim().to_string();
        if slug.is_empty() || slug.contains('/') {
            return Err(DomainError::InvalidSlug(slug));
        }
        let mut article = Self::new(id)?;
        article.slug = Some(slug);
        Ok(article)
    }

    /// Numeric backend id
    pub const fn value(&self) -> u64 {
        self.id
    }

    /// Slug, if the backend has reported one
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Path segment used to address the article on the backend
    ///
    /// Falls back to the numeric id when no slug is known.
    pub fn path_segment(&self) -> String {
        self.slug.clone().unwrap_or_else(|| self.id.to_string())
    }
}

impl PartialEq for ArticleId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ArticleId {}

impl Hash for ArticleId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl std::str::FromStr for ArticleId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<u64>()
            .map_err(|_| DomainError::InvalidArticleId(s.to_string()))?;
        Self::new(id)
    }
}
