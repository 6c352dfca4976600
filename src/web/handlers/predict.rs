//! # Prediction Handler
//!
//! `POST /predict/`: validate the body into a [`FeatureRecord`], score it,
//! and report the outcome through logs, metrics and the response.
//!
//! The body is taken as raw bytes so that every schema problem, including
//! malformed JSON, is reported in the same 422 shape. A body that cannot be
//! read at all (over the size limit, aborted upload) keeps the status axum
//! assigns but is answered with the JSON error body and trace id.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::{Extension, Json};
use std::sync::Arc;
use std::time::Instant;
use tracing::info_span;

use crate::constants::events::{PREDICTION_ERROR, PREDICTION_REJECTED, PREDICTION_SUCCESS};
use crate::logging::log_prediction;
use crate::metrics::inference as inference_metrics;
use crate::models::FeatureRecord;
use crate::web::middleware::trace_context::TraceId;
use crate::web::response_types::{ApiError, PredictionResponse};
use crate::web::state::AppState;

pub async fn predict(
    State(state): State<Arc<AppState>>,
    Extension(trace_id): Extension<TraceId>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let started = Instant::now();

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let status = rejection.status();
            inference_metrics::record_rejection();
            log_prediction!(warn, PREDICTION_REJECTED, trace_id: trace_id,
                reason: rejection.body_text(),
                http_status: status.as_u16());
            return Err(ApiError::rejected(status, rejection.body_text(), trace_id));
        }
    };

    let record = match state.validator.validate_bytes(&body) {
        Ok(record) => record,
        Err(error) => {
            inference_metrics::record_rejection();
            log_prediction!(warn, PREDICTION_REJECTED, trace_id: trace_id,
                fields: error.field_names().join(","));
            return Err(ApiError::validation(error, trace_id));
        }
    };

    let span = info_span!(
        "model_inference",
        trace_id = %trace_id,
        model = state.inference.model_name(),
    );
    let outcome = span.in_scope(|| state.inference.predict(&record));

    match outcome {
        Ok(result) => {
            let latency_ms = round_latency(started.elapsed().as_secs_f64() * 1000.0);
            inference_metrics::record_success(latency_ms, result.predicted_class);
            log_prediction!(info, PREDICTION_SUCCESS, trace_id: trace_id,
                input: input_json(&record),
                result: result.predicted_class,
                probability: result.probability,
                latency_ms: latency_ms,
                status: "success");
            Ok(Json(PredictionResponse::from(result)))
        }
        Err(error) => {
            inference_metrics::record_failure();
            log_prediction!(error, PREDICTION_ERROR, trace_id: trace_id,
                input: input_json(&record),
                error: error,
                status: "failure");
            Err(ApiError::prediction(error, trace_id))
        }
    }
}

/// Latency rounded to two decimals for logs and the histogram
fn round_latency(latency_ms: f64) -> f64 {
    (latency_ms * 100.0).round() / 100.0
}

fn input_json(record: &FeatureRecord) -> String {
    serde_json::to_string(record).unwrap_or_else(|_| format!("{record:?}"))
}
