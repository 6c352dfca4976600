//! # Feature Record
//!
//! The 13-field clinical feature record accepted by `/predict/` and its
//! ordered vector form handed to the classifier.

use serde::Serialize;

use crate::constants::{FEATURE_COUNT, FEATURE_ORDER};

/// One validated patient feature record.
///
/// Built by [`crate::validation::RequestValidator`]; lives for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub age: f64,
    pub gender: f64,
    pub cp: f64,
    pub trestbps: f64,
    pub chol: f64,
    pub fbs: f64,
    pub restecg: f64,
    pub thalach: f64,
    pub exang: f64,
    pub oldpeak: f64,
    pub slope: f64,
    pub ca: f64,
    pub thal: f64,
}

impl FeatureRecord {
    /// Build a record from values laid out in `FEATURE_ORDER`
    pub fn from_feature_vector(vector: FeatureVector) -> Self {
        let [age, gender, cp, trestbps, chol, fbs, restecg, thalach, exang, oldpeak, slope, ca, thal] =
            vector.0;
        Self {
            age,
            gender,
            cp,
            trestbps,
            chol,
            fbs,
            restecg,
            thalach,
            exang,
            oldpeak,
            slope,
            ca,
            thal,
        }
    }

    /// Assemble the single-row model input in training-time column order
    pub fn to_feature_vector(&self) -> FeatureVector {
        FeatureVector([
            self.age,
            self.gender,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ])
    }

    /// Look up a feature by its schema name
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_ORDER
            .iter()
            .position(|feature| *feature == name)
            .map(|index| self.to_feature_vector().0[index])
    }
}

/// Feature values ordered exactly as `FEATURE_ORDER`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Iterate `(name, value)` pairs in column order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_ORDER.iter().copied().zip(self.0.iter().copied())
    }
}
