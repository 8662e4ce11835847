//! # Integration Tests for paramguard-api
//!
//! Drives the full router (trace layer, panic catcher, schema guard and
//! handlers) with the demo configuration from `config/paramguard.yaml`.

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use paramguard_api::state::{AppConfig, AppState};

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

/// Helper: build the app with the demo validation config.
fn test_app() -> axum::Router {
    let config = AppConfig {
        config_path: Some(repo_root().join("config/paramguard.yaml")),
        ..Default::default()
    };
    let state = paramguard_api::bootstrap::bootstrap(config).unwrap();
    paramguard_api::app(state)
}

/// Helper: build the app with validation disabled.
fn unguarded_app() -> axum::Router {
    paramguard_api::app(AppState::new())
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn error_message(body: &str) -> (String, String) {
    let value: serde_json::Value = serde_json::from_str(body).unwrap();
    (
        value["error"]["code"].as_str().unwrap().to_string(),
        value["error"]["message"].as_str().unwrap().to_string(),
    )
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let (status, body) = get(test_app(), "/health/liveness").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let (status, body) = get(test_app(), "/health/readiness?probe=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ready");
}

#[tokio::test]
async fn test_metrics_without_recorder_is_not_found() {
    let (status, body) = get(test_app(), "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body).0, "NOT_FOUND");
}

// -- User Listing -------------------------------------------------------------

#[tokio::test]
async fn test_list_users_valid() {
    let (status, body) = get(
        test_app(),
        "/api/users?pageNum=1&pageSize=20&status=yes&userIds=1,2,3",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_list_users_custom_message() {
    let (status, body) = get(test_app(), "/api/users?pageNum=abc&pageSize=20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (code, message) = error_message(&body);
    assert_eq!(code, "VALIDATION_ERROR");
    assert_eq!(
        message,
        "parameter 'pageNum' failed validation: 'must be a positive integer'"
    );
}

#[tokio::test]
async fn test_list_users_joins_multiple_failures() {
    let (status, body) = get(test_app(), "/api/users?pageNum=0&pageSize=500").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, message) = error_message(&body);
    assert!(message.contains("pageNum"), "got: {message}");
    assert!(message.contains("pageSize"), "got: {message}");
    assert!(message.contains("; "), "got: {message}");
}

#[tokio::test]
async fn test_list_users_missing_page_size() {
    let (status, body) = get(test_app(), "/api/users?pageNum=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).1.contains("pageSize"));
}

// -- Path Variables -----------------------------------------------------------

#[tokio::test]
async fn test_user_order_valid() {
    let (status, body) = get(test_app(), "/api/users/7/orders/8?status=NO").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_user_order_rejects_bad_order_id() {
    let (status, body) = get(test_app(), "/api/users/7/orders/x1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (code, message) = error_message(&body);
    assert_eq!(code, "VALIDATION_ERROR");
    assert_eq!(
        message,
        "parameter 'orderId' failed validation: 'must be a positive integer'"
    );
}

#[tokio::test]
async fn test_path_variable_overrides_query_param() {
    // The query tries to smuggle a valid userId past a bad path segment.
    let (status, body) = get(test_app(), "/api/users/0?userId=5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).1.contains("userId"));
}

#[tokio::test]
async fn test_unknown_status_is_bad_request() {
    let (status, body) = get(test_app(), "/api/users/7?status=maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body).0, "BAD_REQUEST");
}

// -- Pass-through -------------------------------------------------------------

#[tokio::test]
async fn test_non_get_is_not_validated() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    // The guard lets it through; the router has no POST handler.
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_disabled_validation_defers_to_handler() {
    let (status, body) = get(unguarded_app(), "/api/users?pageNum=abc&pageSize=20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (code, message) = error_message(&body);
    assert_eq!(code, "BAD_REQUEST");
    assert!(message.contains("pageNum"));
}

#[tokio::test]
async fn test_unregistered_route_fails_open() {
    let (status, _) = get(test_app(), "/api/products?id=abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
