//! Blog backend integration
//!
//! Client for the post endpoints of the blog's REST API. Only the calls the
//! editor needs while drafting are covered: creating a draft, updating it and
//! checking that the server answers at all.

pub mod client;
mod models;

pub use client::{BlogApiConfig, BlogApiError, BlogClient, HttpBlogClient};
pub use models::{PostPayload, PostSaved, PostStatus};
