#![allow(clippy::doc_markdown)] // Allow technical terms like OpenTelemetry, OTLP in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Heart Risk API
//!
//! Prediction-serving API for a heart-disease risk classifier.
//!
//! ## Overview
//!
//! A binary classifier is trained offline from 13 tabular clinical features and
//! persisted as a JSON artifact. This crate loads that artifact at startup,
//! serves predictions over HTTP, and exposes Kubernetes liveness and readiness
//! probes. Every request is timed and correlated with a trace id.
//!
//! ## Request Path
//!
//! ```text
//! POST /predict/ ─► validation ─► FeatureRecord ─► FeatureVector (FEATURE_ORDER)
//!                                                       │
//!                        PredictionResponse ◄─ threshold ◄─ Classifier::predict_proba
//! ```
//!
//! ## Module Organization
//!
//! - [`models`] - Feature record, feature vector and prediction result types
//! - [`validation`] - Request schema validation with per-field violations
//! - [`inference`] - Artifact loading, the classifier seam and the invoker
//! - [`health`] - Liveness and readiness flags
//! - [`web`] - axum routes, handlers and middleware
//! - [`bootstrap`] - Startup sequence and graceful shutdown
//! - [`config`] - Environment-aware YAML configuration
//! - [`logging`] / [`metrics`] - Tracing subscriber and OpenTelemetry export
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use heart_risk::bootstrap::ServiceBootstrap;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! heart_risk::logging::init_tracing();
//!
//! let handle = ServiceBootstrap::bootstrap().await?;
//! handle.run_until(async {
//!     let _ = tokio::signal::ctrl_c().await;
//! }).await?;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error;
pub mod health;
pub mod inference;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod validation;
pub mod web;

pub use config::{ConfigManager, HeartRiskConfig};
pub use constants::{DECISION_THRESHOLD, FEATURE_ORDER};
pub use error::{HeartRiskError, ModelError, ModelLoadError, PredictionError, Result};
pub use health::HealthState;
pub use models::{FeatureRecord, FeatureVector, PredictedClass, PredictionResult};
pub use validation::{RequestValidator, ValidationError};
