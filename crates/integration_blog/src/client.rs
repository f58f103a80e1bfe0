//! Blog REST client
//!
//! HTTP client for the post endpoints of the blog backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::{PostPayload, PostSaved};

/// Longest response body excerpt kept in an error message
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Blog client errors
#[derive(Debug, Error)]
pub enum BlogApiError {
    /// The server could not be reached or did not answer in time
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The server rejected the request
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Missing or rejected access token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The server failed to process the request
    #[error("Server error: {0}")]
    ServerError(String),

    /// The response body could not be understood
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The client could not be built from its configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Blog API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BlogApiConfig {
    /// API base URL (default: <http://localhost:8000/api>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<SecretString>,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for BlogApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            token: None,
        }
    }
}

/// Client for the blog's post endpoints
#[async_trait]
pub trait BlogClient: Send + Sync {
    /// Create a post from a draft payload
    async fn create_draft(&self, payload: &PostPayload) -> Result<PostSaved, BlogApiError>;

    /// Update the post addressed by `path_segment` (its slug, or its id)
    async fn update_draft(
        &self,
        path_segment: &str,
        payload: &PostPayload,
    ) -> Result<PostSaved, BlogApiError>;

    /// Whether the server answers requests at all
    ///
    /// Client errors still count as reachable; only transport failures and
    /// server errors do not.
    async fn is_reachable(&self) -> bool;
}

/// reqwest-based [`BlogClient`]
#[derive(Debug)]
pub struct HttpBlogClient {
    client: Client,
    config: BlogApiConfig,
}

impl HttpBlogClient {
    /// Create a client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be
    /// initialized.
    pub fn new(config: BlogApiConfig) -> Result<Self, BlogApiError> {
        if config.base_url.trim().is_empty() {
            return Err(BlogApiError::InvalidConfig("base_url is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BlogApiError::InvalidConfig(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn posts_url(&self) -> String {
        format!("{}/posts/", self.base())
    }

    fn post_url(&self, path_segment: &str) -> String {
        format!("{}/posts/{}/", self.base(), path_segment)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BlogApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| BlogApiError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = format!("HTTP {status}: {}", truncate(&body));
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BlogApiError::Unauthorized(detail),
            s if s.is_server_error() => BlogApiError::ServerError(detail),
            _ => BlogApiError::RequestFailed(detail),
        })
    }

    async fn parse_saved(response: Response) -> Result<PostSaved, BlogApiError> {
        response
            .json()
            .await
            .map_err(|e| BlogApiError::ParseError(e.to_string()))
    }
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    cut.push('…');
    cut
}

#[async_trait]
impl BlogClient for HttpBlogClient {
    #[instrument(skip(self, payload), fields(title = %payload.title))]
    async fn create_draft(&self, payload: &PostPayload) -> Result<PostSaved, BlogApiError> {
        let url = self.posts_url();
        debug!(url = %url, "Creating draft post");

        let response = self.send(self.client.post(&url).json(payload)).await?;
        let saved = Self::parse_saved(response).await?;

        debug!(id = saved.id, "Draft post created");
        Ok(saved)
    }

    #[instrument(skip(self, payload))]
    async fn update_draft(
        &self,
        path_segment: &str,
        payload: &PostPayload,
    ) -> Result<PostSaved, BlogApiError> {
        let url = self.post_url(path_segment);
        debug!(url = %url, "Updating draft post");

        let response = self.send(self.client.patch(&url).json(payload)).await?;
        Self::parse_saved(response).await
    }

    async fn is_reachable(&self) -> bool {
        let request = self.client.get(self.posts_url()).query(&[("page", "1")]);
        match self.authorize(request).send().await {
            Ok(response) => !response.status().is_server_error(),
            Err(e) => {
                warn!(error = %e, "Blog backend unreachable");
                false
            },
        }
    }
}
