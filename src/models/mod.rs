//! # Domain Models
//!
//! Request-scoped value types flowing through the prediction path.

pub mod feature_record;
pub mod prediction;

// Re-export core models for easy access
pub use feature_record::{FeatureRecord, FeatureVector};
pub use prediction::{ClassProbabilities, PredictedClass, PredictionResult};
