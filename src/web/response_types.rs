//! # Web API Response Types
//!
//! Response bodies for the prediction API and the [`ApiError`] type with its
//! HTTP conversion. Server-side failures never leak internal detail to the
//! client; the trace id is the only handle for correlating with logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use super::middleware::trace_context::TraceId;
use crate::error::PredictionError;
use crate::models::{PredictedClass, PredictionResult};
use crate::validation::{FieldViolation, ValidationError};

/// Generic detail returned for every 500 response
pub const INTERNAL_SERVER_ERROR_DETAIL: &str = "Internal Server Error";

/// Detail returned when a request exceeds the configured timeout
pub const REQUEST_TIMEOUT_DETAIL: &str = "Request Timeout";

/// Body of a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResponse {
    pub predicted_class: PredictedClass,
    pub probability_heart_disease_present: f64,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            predicted_class: result.predicted_class,
            probability_heart_disease_present: result.probability,
        }
    }
}

/// Body of the probe endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub const ALIVE: Self = Self { status: "alive" };
    pub const NOT_ALIVE: Self = Self { status: "not_alive" };
    pub const READY: Self = Self { status: "ready" };
    pub const NOT_READY: Self = Self { status: "not_ready" };
}

/// Body of a 422 response
#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub detail: Vec<FieldViolation>,
    pub trace_id: String,
}

/// Body of every non-validation error response (408, 413, 500, ...)
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub trace_id: String,
}

/// Web API errors with HTTP status code mappings
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{source}")]
    Validation {
        source: ValidationError,
        trace_id: TraceId,
    },

    #[error("Prediction failed: {source}")]
    Prediction {
        source: PredictionError,
        trace_id: TraceId,
    },

    /// Body could not be read, e.g. over the size limit
    #[error("{detail}")]
    Rejected {
        status: StatusCode,
        detail: String,
        trace_id: TraceId,
    },

    #[error("Request timed out")]
    Timeout { trace_id: TraceId },

    #[error("Internal server error")]
    Internal { trace_id: TraceId },
}

impl ApiError {
    pub fn validation(source: ValidationError, trace_id: TraceId) -> Self {
        Self::Validation { source, trace_id }
    }

    pub fn prediction(source: PredictionError, trace_id: TraceId) -> Self {
        Self::Prediction { source, trace_id }
    }

    pub fn rejected(status: StatusCode, detail: impl Into<String>, trace_id: TraceId) -> Self {
        Self::Rejected {
            status,
            detail: detail.into(),
            trace_id,
        }
    }

    pub fn timeout(trace_id: TraceId) -> Self {
        Self::Timeout { trace_id }
    }

    pub fn internal(trace_id: TraceId) -> Self {
        Self::Internal { trace_id }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Rejected { status, .. } => *status,
            Self::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            Self::Prediction { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn trace_id(&self) -> &TraceId {
        match self {
            Self::Validation { trace_id, .. }
            | Self::Prediction { trace_id, .. }
            | Self::Rejected { trace_id, .. }
            | Self::Timeout { trace_id }
            | Self::Internal { trace_id } => trace_id,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        match self {
            Self::Validation { source, trace_id } => (
                status_code,
                Json(ValidationErrorResponse {
                    detail: source.violations,
                    trace_id: trace_id.into_inner(),
                }),
            )
                .into_response(),
            Self::Rejected {
                detail, trace_id, ..
            } => error_response(status_code, detail, trace_id),
            Self::Timeout { trace_id } => {
                error_response(status_code, REQUEST_TIMEOUT_DETAIL.to_owned(), trace_id)
            }
            Self::Prediction { trace_id, .. } | Self::Internal { trace_id } => error_response(
                status_code,
                INTERNAL_SERVER_ERROR_DETAIL.to_owned(),
                trace_id,
            ),
        }
    }
}

fn error_response(status_code: StatusCode, detail: String, trace_id: TraceId) -> Response {
    (
        status_code,
        Json(ErrorResponse {
            detail,
            trace_id: trace_id.into_inner(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::validation::RequestValidator;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let source = RequestValidator::default()
            .validate(&serde_json::json!({}))
            .unwrap_err();
        let error = ApiError::validation(source, TraceId::from("abc123".to_string()));

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["trace_id"], "abc123");
        assert_eq!(body["detail"].as_array().unwrap().len(), 13);
        assert_eq!(body["detail"][0]["field"], "age");
        assert_eq!(body["detail"][0]["type"], "missing");
    }

    #[tokio::test]
    async fn test_prediction_error_hides_detail() {
        let error = ApiError::prediction(
            PredictionError::ModelInvocation(ModelError::Evaluation("secret internals".into())),
            TraceId::from("0af7651916cd43dd8448eb211c80319c".to_string()),
        );

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["detail"], INTERNAL_SERVER_ERROR_DETAIL);
        assert_eq!(body["trace_id"], "0af7651916cd43dd8448eb211c80319c");
        assert!(!body.to_string().contains("secret internals"));
    }

    #[tokio::test]
    async fn test_rejected_keeps_status_and_detail() {
        let error = ApiError::rejected(
            StatusCode::PAYLOAD_TOO_LARGE,
            "length limit exceeded",
            TraceId::from("4bf92f3577b34da6a3ce929d0e0e4736".to_string()),
        );

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body = body_json(response).await;
        assert_eq!(body["detail"], "length limit exceeded");
        assert_eq!(body["trace_id"], "4bf92f3577b34da6a3ce929d0e0e4736");
    }

    #[tokio::test]
    async fn test_timeout_response() {
        let response = ApiError::timeout(TraceId::from("abc".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let body = body_json(response).await;
        assert_eq!(body["detail"], REQUEST_TIMEOUT_DETAIL);
        assert_eq!(body["trace_id"], "abc");
    }

    #[test]
    fn test_prediction_response_shape() {
        let response = PredictionResponse::from(PredictionResult::from_probability(0.81));
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["predicted_class"], "Yes");
        assert_eq!(value["probability_heart_disease_present"], 0.81);
    }
}
