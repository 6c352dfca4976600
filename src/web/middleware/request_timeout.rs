//! # Request Timeout Middleware
//!
//! Bounds the time spent below this layer. An expired request is answered with
//! a 408 carrying the same `{detail, trace_id}` body as other error responses.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::time::Duration;

use super::trace_context::TraceId;
use crate::constants::events::REQUEST_TIMED_OUT;
use crate::web::response_types::ApiError;

pub async fn request_timeout(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let trace_id = request
        .extensions()
        .get::<TraceId>()
        .cloned()
        .unwrap_or_else(TraceId::generate);
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                event = REQUEST_TIMED_OUT,
                trace_id = %trace_id,
                method = %method,
                path = %path,
                timeout_ms = limit.as_millis() as u64,
                status = "timeout",
                "Request exceeded the configured timeout"
            );
            ApiError::timeout(trace_id).into_response()
        }
    }
}
