//! # Inference Service
//!
//! Invokes the shared classifier for one validated record and applies the
//! decision threshold. Model failures, including panics inside the model call,
//! come back as [`PredictionError`] rather than escaping to the caller.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::classifier::Classifier;
use crate::error::{panic_message, PredictionError};
use crate::models::{FeatureRecord, PredictionResult};

/// Invoker wrapping the process-wide classifier
#[derive(Debug, Clone)]
pub struct InferenceService {
    classifier: Arc<dyn Classifier>,
}

impl InferenceService {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    /// Score one record: assemble → predict_proba → positive class → threshold
    pub fn predict(&self, record: &FeatureRecord) -> Result<PredictionResult, PredictionError> {
        let features = record.to_feature_vector();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.classifier.predict_proba(&features)
        }))
        .map_err(|payload| PredictionError::ModelPanicked(panic_message(payload.as_ref())))?;

        let probability = outcome?.positive;
        if !(0.0..=1.0).contains(&probability) {
            return Err(PredictionError::InvalidProbability(probability));
        }

        Ok(PredictionResult::from_probability(probability))
    }
}

/// Representative record used for the startup warm-up inference
pub fn reference_record() -> FeatureRecord {
    FeatureRecord {
        age: 63.0,
        gender: 1.0,
        cp: 3.0,
        trestbps: 145.0,
        chol: 233.0,
        fbs: 1.0,
        restecg: 0.0,
        thalach: 150.0,
        exang: 0.0,
        oldpeak: 2.3,
        slope: 0.0,
        ca: 0.0,
        thal: 1.0,
    }
}
