//! Error types for the prediction service.
//!
//! Each stage of the request path returns its own error so the HTTP surface can
//! map outcomes to status codes without inspecting messages:
//! validation → [`crate::validation::ValidationError`] (422),
//! inference → [`PredictionError`] (500), startup → [`ModelLoadError`] /
//! [`crate::config::ConfigurationError`] (fatal).

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigurationError;

/// Failure raised by a classifier while scoring a row
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Non-finite decision value for input")]
    NonFiniteScore,
    #[error("Model evaluation failed: {0}")]
    Evaluation(String),
}

/// Failure of the inference invoker; always surfaced as a generic 500
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Model invocation failed: {0}")]
    ModelInvocation(#[from] ModelError),
    #[error("Model panicked during inference: {0}")]
    ModelPanicked(String),
    #[error("Model returned invalid probability {0}")]
    InvalidProbability(f64),
}

/// Model artifact could not be turned into a usable classifier
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Model artifact not found at '{}'", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read model artifact '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model artifact '{}' is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported model type '{0}'")]
    UnsupportedModelType(String),

    #[error("Artifact feature order {found:?} does not match expected {expected:?}")]
    FeatureOrderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Invalid model parameters: {0}")]
    InvalidParameters(String),
}

/// Top-level error for bootstrap and binaries
#[derive(Debug, Error)]
pub enum HeartRiskError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Startup error: {0}")]
    Startup(String),
}

pub type Result<T> = std::result::Result<T, HeartRiskError>;

/// Best-effort text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
