//! # System Constants
//!
//! Fixed contracts shared by the validator, the inference path and the model
//! artifact loader. `FEATURE_ORDER` is the single source of truth for the
//! column order the classifier was trained with.

/// Number of input features expected by the classifier
pub const FEATURE_COUNT: usize = 13;

/// Canonical training-time column order.
///
/// The request schema, the assembled feature vector and the artifact's
/// `feature_names` must all agree with this list position for position.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "age", "gender", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Positive-class probability strictly above this value yields "Yes"
pub const DECISION_THRESHOLD: f64 = 0.5;

/// HTTP header names
pub mod headers {
    pub const PROCESS_TIME_MS: &str = "x-process-time-ms";
    pub const TRACE_ID: &str = "x-trace-id";
}

/// Structured log event names emitted by the prediction path
pub mod events {
    pub const PREDICTION_SUCCESS: &str = "prediction_success";
    pub const PREDICTION_ERROR: &str = "prediction_error";
    pub const PREDICTION_REJECTED: &str = "prediction_rejected";
    pub const UNHANDLED_EXCEPTION: &str = "unhandled_exception";
    pub const REQUEST_TIMED_OUT: &str = "request_timed_out";
    pub const MODEL_LOADED: &str = "model_loaded";
    pub const WARMUP_COMPLETED: &str = "warmup_completed";
    pub const WARMUP_FAILED: &str = "warmup_failed";
}

/// Request bodies larger than this are refused before validation (64KB)
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Model type tag accepted in artifacts
pub const LOGISTIC_REGRESSION_MODEL_TYPE: &str = "logistic_regression";
