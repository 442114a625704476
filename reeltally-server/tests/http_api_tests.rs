//! Integration tests for the reeltally HTTP API
//!
//! Tests cover:
//! - Health endpoint shape
//! - Statistics queries end to end over scripted collaborators
//! - Error envelope and status mapping for failing queries
//! - Parameter validation by the query extractor

mod helpers;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

use reeltally_server::service::{GenrePeriodService, QueryLimits};
use reeltally_server::{build_router, AppState};

use helpers::{action_provider, genre_catalog, MockCache, MockProvider};

/// Test helper: app over scripted collaborators
fn setup_app(provider: MockProvider, cache: MockCache) -> axum::Router {
    let service = Arc::new(GenrePeriodService::new(
        Arc::new(provider),
        Arc::new(cache),
        QueryLimits::default(),
    ));
    build_router(AppState::new(service))
}

/// Test helper: build a GET request
fn test_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(MockProvider::new(), MockCache::new());

    let response = app.oneshot(test_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "reeltally-server");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_u64());
}

// =============================================================================
// Statistics Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_genre_stats_success() {
    let app = setup_app(action_provider(), MockCache::new());

    let uri =
        "/genre-stats?genre_id=28&start_date=2021-01-01&end_date=2021-12-31&revenue=1&operator=gt";
    let response = app.oneshot(test_request(uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["genre_id"], 28);
    assert_eq!(body["genre_name"], "Action");
    assert_eq!(body["percentage"], 25.0);

    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["id"], 1);
    assert_eq!(movies[0]["title"], "Some Movie");
    assert_eq!(movies[0]["revenue"], 1000);
}

#[tokio::test]
async fn test_unknown_genre_maps_to_not_found() {
    let app = setup_app(
        MockProvider::new().with_genres(genre_catalog()),
        MockCache::new(),
    );

    let uri =
        "/genre-stats?genre_id=99&start_date=2021-01-01&end_date=2021-12-31&revenue=1&operator=gt";
    let response = app.oneshot(test_request(uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "GENRE_NOT_FOUND");
    assert_eq!(body["error"]["message"], "no genre with id 99");
}

#[tokio::test]
async fn test_provider_failure_maps_to_bad_gateway() {
    let provider = MockProvider::new()
        .with_genres(genre_catalog())
        .on_discover_error(None, None, "discover exploded")
        .on_discover_error(Some(28), None, "discover exploded");
    let app = setup_app(provider, MockCache::new());

    let uri =
        "/genre-stats?genre_id=28&start_date=2021-01-01&end_date=2021-12-31&revenue=1&operator=gt";
    let response = app.oneshot(test_request(uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "PROVIDER_ERROR");
}

// =============================================================================
// Parameter Validation Tests
// =============================================================================

#[tokio::test]
async fn test_malformed_params_are_rejected() {
    let app = setup_app(action_provider(), MockCache::new());

    // missing genre_id
    let uri = "/genre-stats?start_date=2021-01-01&end_date=2021-12-31&revenue=1&operator=gt";
    let response = app.clone().oneshot(test_request(uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // unknown operator
    let uri =
        "/genre-stats?genre_id=28&start_date=2021-01-01&end_date=2021-12-31&revenue=1&operator=ge";
    let response = app.clone().oneshot(test_request(uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // unparseable date
    let uri =
        "/genre-stats?genre_id=28&start_date=not-a-date&end_date=2021-12-31&revenue=1&operator=gt";
    let response = app.oneshot(test_request(uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
