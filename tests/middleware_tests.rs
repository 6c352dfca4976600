//! # Middleware Stack Tests
//!
//! Exercises the stack against purpose-built routes so that the fault guard
//! and timeout paths can be hit directly.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;

use common::*;
use heart_risk::config::HeartRiskConfig;
use heart_risk::health::HealthState;
use heart_risk::inference::InferenceService;
use heart_risk::web::middleware::apply_middleware_stack;
use heart_risk::web::AppState;

async fn explode() -> &'static str {
    panic!("handler blew up");
}

async fn linger() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "done"
}

fn router(timeout: Duration) -> Router {
    let state = AppState::new(
        &HeartRiskConfig::default(),
        InferenceService::new(Arc::new(FixedClassifier(0.5))),
        None,
        Arc::new(HealthState::new()),
    );
    let routes = Router::new()
        .route("/explode", get(explode))
        .route("/linger", get(linger));

    apply_middleware_stack(routes, timeout).with_state(Arc::new(state))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_fault_guard_converts_panic_to_500() {
    let response = send(&router(Duration::from_secs(30)), get_request("/explode")).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["detail"], "Internal Server Error");
    assert!(is_trace_id(&response.body["trace_id"]));
    assert!(response.process_time_ms() >= 0.0);
}

#[tokio::test]
async fn test_caller_trace_id_is_preserved_in_error_body() {
    let request = Request::builder()
        .uri("/explode")
        .header(
            "traceparent",
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01",
        )
        .body(Body::empty())
        .unwrap();

    let response = send(&router(Duration::from_secs(30)), request).await;

    // Without an installed propagator a fresh id is generated, with one the
    // caller's id is continued. Either way the body and header agree.
    assert!(is_trace_id(&response.body["trace_id"]));
    assert_eq!(
        response.header("x-trace-id"),
        response.body["trace_id"].as_str()
    );
}

#[tokio::test(start_paused = true)]
async fn test_timeout_returns_408_with_process_time() {
    let response = send(&router(Duration::from_millis(100)), get_request("/linger")).await;

    assert_eq!(response.status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.body["detail"], "Request Timeout");
    assert!(is_trace_id(&response.body["trace_id"]));
    assert!(response.process_time_ms() >= 0.0);
}
