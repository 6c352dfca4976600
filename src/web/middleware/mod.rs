//! # Web API Middleware
//!
//! Middleware stack for the prediction API: processing-time header, trace
//! context, request tracing, timeouts and the last-resort fault guard.

pub mod fault_guard;
pub mod process_time;
pub mod request_timeout;
pub mod trace_context;

use axum::middleware;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::web::state::AppState;

/// Apply the middleware stack to the router
///
/// Layers run outermost first:
/// 1. Processing time measurement, so every response carries the header
/// 2. Trace context, which opens the request span and assigns the trace id
/// 3. Request tracing
/// 4. Request timeout, answering 408 with the trace id
/// 5. Fault guard, converting handler panics into a 500 with the trace id
pub fn apply_middleware_stack(
    router: Router<Arc<AppState>>,
    request_timeout: Duration,
) -> Router<Arc<AppState>> {
    router
        .layer(middleware::from_fn(fault_guard::fault_guard))
        .layer(middleware::from_fn_with_state(
            request_timeout,
            request_timeout::request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_context::trace_context))
        // Outermost
        .layer(middleware::from_fn(process_time::process_time))
}
