//! # Fault Guard Middleware
//!
//! Last-resort handler for panics escaping a route. The panic is logged with
//! the request's trace id and turned into the generic 500 body.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;

use super::trace_context::TraceId;
use crate::constants::events::UNHANDLED_EXCEPTION;
use crate::error::panic_message;
use crate::web::response_types::ApiError;

pub async fn fault_guard(request: Request, next: Next) -> Response {
    let trace_id = request
        .extensions()
        .get::<TraceId>()
        .cloned()
        .unwrap_or_else(TraceId::generate);
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            tracing::error!(
                event = UNHANDLED_EXCEPTION,
                trace_id = %trace_id,
                method = %method,
                path = %path,
                error = %panic_message(payload.as_ref()),
                "Unhandled exception while processing request"
            );
            ApiError::internal(trace_id).into_response()
        }
    }
}
