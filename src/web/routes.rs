//! # Route Definitions
//!
//! Probe routes stay free of body limits; the prediction route caps request
//! bodies before validation ever sees them.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use super::handlers;
use super::state::AppState;
use crate::constants::MAX_REQUEST_BODY_BYTES;

/// Kubernetes probe routes
///
/// - `GET /live_check`
/// - `GET /ready_check`
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/live_check", get(handlers::health::liveness_check))
        .route("/ready_check", get(handlers::health::readiness_check))
}

/// Prediction routes
///
/// The trailing-slash form is canonical; the bare form is accepted as well.
pub fn prediction_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/predict/", post(handlers::predict::predict))
        .route("/predict", post(handlers::predict::predict))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
}
