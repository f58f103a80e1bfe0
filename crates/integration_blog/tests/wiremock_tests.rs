//! Integration tests for the blog client using wiremock
//!
//! These tests verify request shapes and error mapping against a mock HTTP
//! server.

#![allow(clippy::panic)]

use domain::Draft;
use integration_blog::{BlogApiConfig, BlogApiError, BlogClient, HttpBlogClient, PostPayload};
use secrecy::SecretString;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path, query_param},
};

fn client_for(server: &MockServer) -> HttpBlogClient {
    HttpBlogClient::new(BlogApiConfig {
        base_url: format!("{}/api", server.uri()),
        timeout_secs: 5,
        token: None,
    })
    .unwrap()
}

fn payload() -> PostPayload {
    PostPayload::from(&Draft::new("Hello", "First post").with_tags([1]))
}

#[tokio::test]
async fn create_posts_draft_and_returns_identity() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/posts/"))
        .and(body_partial_json(serde_json::json!({
            "title": "Hello",
            "content": "First post",
            "tags": [1],
            "status": "draft"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 42,
            "slug": "hello",
            "title": "Hello",
            "updated_at": "2024-03-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let saved = client_for(&server).create_draft(&payload()).await.unwrap();

    assert_eq!(saved.id, 42);
    assert_eq!(saved.slug.as_deref(), Some("hello"));
    assert!(saved.updated_at.is_some());
}

#[tokio::test]
async fn update_patches_post_by_slug() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/posts/hello/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 42,
            "slug": "hello",
            "updated_at": "2024-03-01T10:05:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let saved = client_for(&server)
        .update_draft("hello", &payload())
        .await
        .unwrap();

    assert_eq!(saved.id, 42);
}

#[tokio::test]
async fn token_is_sent_as_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/posts/"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpBlogClient::new(BlogApiConfig {
        base_url: format!("{}/api", server.uri()),
        timeout_secs: 5,
        token: Some(SecretString::from("s3cret")),
    })
    .unwrap();

    assert!(client.create_draft(&payload()).await.is_ok());
}

#[tokio::test]
async fn validation_error_is_request_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/posts/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"title": ["Ensure this field has no more than 200 characters."]})),
        )
        .mount(&server)
        .await;

    let result = client_for(&server).create_draft(&payload()).await;

    match result {
        Err(BlogApiError::RequestFailed(detail)) => {
            assert!(detail.contains("400"));
            assert!(detail.contains("200 characters"));
        },
        other => panic!("Expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_token_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client_for(&server).update_draft("1", &payload()).await;
    assert!(matches!(result, Err(BlogApiError::Unauthorized(_))));
}

#[tokio::test]
async fn server_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = client_for(&server).update_draft("1", &payload()).await;
    assert!(matches!(result, Err(BlogApiError::ServerError(_))));
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server).create_draft(&payload()).await;
    assert!(matches!(result, Err(BlogApiError::ParseError(_))));
}

#[tokio::test]
async fn unreachable_server_is_connection_failure() {
    let client = HttpBlogClient::new(BlogApiConfig {
        base_url: "http://127.0.0.1:9/api".to_string(),
        timeout_secs: 1,
        token: None,
    })
    .unwrap();

    let result = client.create_draft(&payload()).await;
    assert!(matches!(result, Err(BlogApiError::ConnectionFailed(_))));
    assert!(!client.is_reachable().await);
}

#[tokio::test]
async fn reachability_accepts_client_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts/"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    assert!(client_for(&server).is_reachable().await);
}

#[tokio::test]
async fn reachability_rejects_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    assert!(!client_for(&server).is_reachable().await);
}
