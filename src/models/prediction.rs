//! # Prediction Result

use serde::Serialize;
use std::fmt;

use crate::constants::DECISION_THRESHOLD;

/// Binary label returned to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictedClass {
    Yes,
    No,
}

impl PredictedClass {
    /// Apply the fixed decision threshold (strictly greater than 0.5 is "Yes")
    pub fn from_probability(probability: f64) -> Self {
        if probability > DECISION_THRESHOLD {
            Self::Yes
        } else {
            Self::No
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

impl fmt::Display for PredictedClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-class probabilities produced by a classifier for one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    pub negative: f64,
    pub positive: f64,
}

impl ClassProbabilities {
    pub fn from_positive(positive: f64) -> Self {
        Self {
            negative: 1.0 - positive,
            positive,
        }
    }
}

/// Outcome of one inference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub probability: f64,
    pub predicted_class: PredictedClass,
}

impl PredictionResult {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            probability,
            predicted_class: PredictedClass::from_probability(probability),
        }
    }
}
