//! # Web API Module
//!
//! HTTP surface of the prediction service: Kubernetes probes and the
//! `POST /predict/` endpoint, wrapped in the middleware stack that stamps
//! processing time and trace ids onto every response.

use axum::Router;
use std::sync::Arc;
use tracing::info;

pub mod handlers;
pub mod middleware;
pub mod response_types;
pub mod routes;
pub mod state;

pub use middleware::trace_context::TraceId;
pub use state::AppState;

/// Create the web application with all routes and middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    let request_timeout = state.server.request_timeout();
    let enforce_domain_ranges = state.validator.enforces_domain_ranges();

    let routes = Router::new()
        .merge(routes::health_routes())
        .merge(routes::prediction_routes());

    let app = middleware::apply_middleware_stack(routes, request_timeout).with_state(state);

    info!(
        request_timeout_ms = request_timeout.as_millis() as u64,
        enforce_domain_ranges,
        "Web application created with all routes and middleware"
    );
    app
}
