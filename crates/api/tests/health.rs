//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, MockPublisher, TestApp};

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with a static status, no auth required
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_healthy_without_api_key() {
    let app = TestApp::new(MockPublisher::new("m", "p"));
    let response = get(app.router.clone(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
    assert!(app.publisher.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = TestApp::new(MockPublisher::new("m", "p"));
    let response = get(app.router.clone(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: GET on /create is not allowed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_on_create_returns_405() {
    let app = TestApp::new(MockPublisher::new("m", "p"));
    let response = get(app.router.clone(), "/create").await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = TestApp::new(MockPublisher::new("m", "p"));
    let response = get(app.router.clone(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");

    // The value should be a valid UUID (36 chars with hyphens).
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
