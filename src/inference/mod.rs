//! # Inference
//!
//! Model artifact loading, the [`Classifier`] seam, and the invoker that turns a
//! validated [`crate::models::FeatureRecord`] into a
//! [`crate::models::PredictionResult`].
//!
//! The classifier is loaded once at startup and shared read-only behind an
//! `Arc<dyn Classifier>`; nothing on the request path mutates it.

pub mod artifact;
pub mod classifier;
pub mod service;

pub use artifact::{load_model, LoadedModel, ModelArtifact, ModelMetadata};
pub use classifier::{Classifier, LogisticRegression};
pub use service::{reference_record, InferenceService};
