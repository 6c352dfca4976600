//! # Inference Metrics
//!
//! OpenTelemetry instruments for the prediction path:
//! - Prediction latency histogram (milliseconds)
//! - Prediction counters by predicted class
//! - Failure and validation rejection counters

use opentelemetry::metrics::{Counter, Histogram, Meter};
use opentelemetry::KeyValue;
use std::sync::OnceLock;

use crate::models::PredictedClass;

/// Lazy-initialized meter for inference metrics
static INFERENCE_METER: OnceLock<Meter> = OnceLock::new();

static PREDICTION_LATENCY: OnceLock<Histogram<f64>> = OnceLock::new();
static PREDICTIONS_TOTAL: OnceLock<Counter<u64>> = OnceLock::new();
static PREDICTION_FAILURES_TOTAL: OnceLock<Counter<u64>> = OnceLock::new();
static VALIDATION_REJECTIONS_TOTAL: OnceLock<Counter<u64>> = OnceLock::new();

fn meter() -> &'static Meter {
    INFERENCE_METER.get_or_init(|| opentelemetry::global::meter("heart-risk-api"))
}

/// Eagerly create instruments against the installed provider
pub fn init() {
    let _ = prediction_latency();
    let _ = predictions_total();
    let _ = prediction_failures_total();
    let _ = validation_rejections_total();
}

// Histograms

/// Wall-clock latency of successful predictions in milliseconds
pub fn prediction_latency() -> &'static Histogram<f64> {
    PREDICTION_LATENCY.get_or_init(|| {
        meter()
            .f64_histogram("heart_risk.prediction.latency")
            .with_description("Request latency for heart-risk predictions")
            .with_unit("ms")
            .build()
    })
}

// Counters

/// Successful predictions
///
/// Labels:
/// - predicted_class: Yes, No
pub fn predictions_total() -> &'static Counter<u64> {
    PREDICTIONS_TOTAL.get_or_init(|| {
        meter()
            .u64_counter("heart_risk.predictions.total")
            .with_description("Total number of successful predictions")
            .build()
    })
}

/// Predictions that failed inside the model
pub fn prediction_failures_total() -> &'static Counter<u64> {
    PREDICTION_FAILURES_TOTAL.get_or_init(|| {
        meter()
            .u64_counter("heart_risk.prediction.failures.total")
            .with_description("Total number of predictions that failed during inference")
            .build()
    })
}

/// Requests rejected by schema validation
pub fn validation_rejections_total() -> &'static Counter<u64> {
    VALIDATION_REJECTIONS_TOTAL.get_or_init(|| {
        meter()
            .u64_counter("heart_risk.validation.rejections.total")
            .with_description("Total number of prediction requests rejected by validation")
            .build()
    })
}

/// Record a successful prediction
pub fn record_success(latency_ms: f64, predicted_class: PredictedClass) {
    prediction_latency().record(latency_ms, &[]);
    predictions_total().add(
        1,
        &[KeyValue::new("predicted_class", predicted_class.as_str())],
    );
}

pub fn record_failure() {
    prediction_failures_total().add(1, &[]);
}

pub fn record_rejection() {
    validation_rejections_total().add(1, &[]);
}
