//! Classifier doubles for exercising the request path

use heart_risk::error::ModelError;
use heart_risk::inference::Classifier;
use heart_risk::models::{ClassProbabilities, FeatureVector};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Always returns the same positive-class probability
#[derive(Debug)]
pub struct FixedClassifier(pub f64);

impl Classifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    fn predict_proba(&self, _: &FeatureVector) -> Result<ClassProbabilities, ModelError> {
        Ok(ClassProbabilities::from_positive(self.0))
    }
}

/// Reports an evaluation error on every call
#[derive(Debug)]
pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn name(&self) -> &str {
        "failing"
    }

    fn predict_proba(&self, _: &FeatureVector) -> Result<ClassProbabilities, ModelError> {
        Err(ModelError::Evaluation("column mismatch in frame".into()))
    }
}

/// Panics on every call
#[derive(Debug)]
pub struct PanickingClassifier;

impl Classifier for PanickingClassifier {
    fn name(&self) -> &str {
        "panicking"
    }

    fn predict_proba(&self, _: &FeatureVector) -> Result<ClassProbabilities, ModelError> {
        panic!("model state corrupted");
    }
}

/// Records the vectors it was asked to score
#[derive(Debug, Default)]
pub struct RecordingClassifier {
    pub calls: AtomicUsize,
    pub last: std::sync::Mutex<Option<FeatureVector>>,
}

impl RecordingClassifier {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for RecordingClassifier {
    fn name(&self) -> &str {
        "recording"
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<ClassProbabilities, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last.lock() {
            *last = Some(*features);
        }
        Ok(ClassProbabilities::from_positive(0.25))
    }
}
