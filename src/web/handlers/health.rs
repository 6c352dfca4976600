//! # Health Check Handlers
//!
//! Kubernetes-compatible probes. Liveness reflects whether the process should
//! be restarted; readiness reflects whether a warm-up inference has succeeded.
//! Neither probe touches the model.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::web::response_types::StatusResponse;
use crate::web::state::AppState;

/// Kubernetes liveness probe: GET /live_check
///
/// 200 `{"status":"alive"}` while alive, otherwise 500 `{"status":"not_alive"}`.
pub async fn liveness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<StatusResponse>) {
    if state.health.is_alive() {
        (StatusCode::OK, Json(StatusResponse::ALIVE))
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StatusResponse::NOT_ALIVE),
        )
    }
}

/// Kubernetes readiness probe: GET /ready_check
///
/// 200 `{"status":"ready"}` once ready, otherwise 503 `{"status":"not_ready"}`.
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<StatusResponse>) {
    if state.health.is_ready() {
        (StatusCode::OK, Json(StatusResponse::READY))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(StatusResponse::NOT_READY),
        )
    }
}
