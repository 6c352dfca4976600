//! # Classifier
//!
//! The `Classifier` trait is the only surface the request path sees of a model.
//! `LogisticRegression` is the concrete model produced by the offline training
//! job.

use std::fmt;

use crate::constants::FEATURE_COUNT;
use crate::error::{ModelError, ModelLoadError};
use crate::models::{ClassProbabilities, FeatureVector};

/// Binary classifier scoring one ordered feature row
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Class probabilities for a single row in `FEATURE_ORDER` order
    fn predict_proba(&self, features: &FeatureVector) -> Result<ClassProbabilities, ModelError>;
}

/// Linear model over raw (unscaled) features with a logistic link
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(coefficients: [f64; FEATURE_COUNT], intercept: f64) -> Result<Self, ModelLoadError> {
        if let Some(index) = coefficients.iter().position(|c| !c.is_finite()) {
            return Err(ModelLoadError::InvalidParameters(format!(
                "coefficient {index} is not finite"
            )));
        }
        if !intercept.is_finite() {
            return Err(ModelLoadError::InvalidParameters(
                "intercept is not finite".to_string(),
            ));
        }

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub fn coefficients(&self) -> &[f64; FEATURE_COUNT] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Signed distance from the decision boundary (log-odds of the positive class)
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(features.as_slice())
            .fold(self.intercept, |acc, (weight, value)| acc + weight * value)
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<ClassProbabilities, ModelError> {
        let score = self.decision_function(features);
        if !score.is_finite() {
            return Err(ModelError::NonFiniteScore);
        }
        Ok(ClassProbabilities::from_positive(sigmoid(score)))
    }
}

/// Logistic function without overflow for large |z|
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_model(intercept: f64) -> LogisticRegression {
        LogisticRegression::new([0.0; FEATURE_COUNT], intercept).unwrap()
    }

    #[test]
    fn test_intercept_only_model() {
        let model = zero_model(0.0);
        let probs = model
            .predict_proba(&FeatureVector([5.0; FEATURE_COUNT]))
            .unwrap();
        assert!((probs.positive - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_decision_function_weights_columns_in_order() {
        let mut coefficients = [0.0; FEATURE_COUNT];
        coefficients[9] = 2.0; // oldpeak
        let model = LogisticRegression::new(coefficients, -1.0).unwrap();

        let mut row = [0.0; FEATURE_COUNT];
        row[9] = 3.0;
        assert_eq!(model.decision_function(&FeatureVector(row)), 5.0);

        // Same value in a different column must not contribute
        let mut shifted = [0.0; FEATURE_COUNT];
        shifted[10] = 3.0;
        assert_eq!(model.decision_function(&FeatureVector(shifted)), -1.0);
    }

    #[test]
    fn test_sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert_eq!(sigmoid(1000.0), 1.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_finite_parameters() {
        let mut coefficients = [0.1; FEATURE_COUNT];
        coefficients[3] = f64::NAN;
        assert!(matches!(
            LogisticRegression::new(coefficients, 0.0),
            Err(ModelLoadError::InvalidParameters(_))
        ));
        assert!(LogisticRegression::new([0.1; FEATURE_COUNT], f64::INFINITY).is_err());
    }

    #[test]
    fn test_non_finite_input_is_a_model_error() {
        let model = LogisticRegression::new([1.0; FEATURE_COUNT], 0.0).unwrap();
        let mut row = [0.0; FEATURE_COUNT];
        row[0] = f64::MAX;
        row[1] = f64::MAX;
        assert_eq!(
            model.predict_proba(&FeatureVector(row)),
            Err(ModelError::NonFiniteScore)
        );
    }
}
