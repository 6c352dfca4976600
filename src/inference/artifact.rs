//! # Model Artifact Loader
//!
//! Reads the JSON artifact deposited by the offline training pipeline and turns
//! it into a shared [`Classifier`]. Any problem here is fatal at startup; the
//! server never runs without a model.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::classifier::{Classifier, LogisticRegression};
use crate::constants::{events, FEATURE_COUNT, FEATURE_ORDER, LOGISTIC_REGRESSION_MODEL_TYPE};
use crate::error::ModelLoadError;

/// On-disk model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<String>,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl ModelArtifact {
    /// Read and parse an artifact file without building the classifier
    pub fn from_path(path: &Path) -> Result<Self, ModelLoadError> {
        let bytes = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ModelLoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ModelLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        serde_json::from_slice(&bytes).map_err(|source| ModelLoadError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The artifact's column order must be exactly the serving column order
    pub fn verify_feature_order(&self) -> Result<(), ModelLoadError> {
        let matches = self.feature_names.len() == FEATURE_COUNT
            && self
                .feature_names
                .iter()
                .zip(FEATURE_ORDER.iter())
                .all(|(found, expected)| found == expected);

        if matches {
            Ok(())
        } else {
            Err(ModelLoadError::FeatureOrderMismatch {
                expected: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
                found: self.feature_names.clone(),
            })
        }
    }

    /// Validate the artifact and build its classifier
    pub fn build_classifier(&self) -> Result<LogisticRegression, ModelLoadError> {
        if self.model_type != LOGISTIC_REGRESSION_MODEL_TYPE {
            return Err(ModelLoadError::UnsupportedModelType(self.model_type.clone()));
        }

        self.verify_feature_order()?;

        let coefficients: [f64; FEATURE_COUNT] =
            self.coefficients.as_slice().try_into().map_err(|_| {
                ModelLoadError::InvalidParameters(format!(
                    "expected {FEATURE_COUNT} coefficients, found {}",
                    self.coefficients.len()
                ))
            })?;

        LogisticRegression::new(coefficients, self.intercept)
    }
}

/// Descriptive information about the loaded model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelMetadata {
    pub model_type: String,
    pub version: String,
    pub trained_at: Option<String>,
    pub artifact_path: PathBuf,
}

/// A classifier ready to be shared across requests
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub classifier: Arc<dyn Classifier>,
    pub metadata: ModelMetadata,
}

/// Load the model artifact at `path`
pub fn load_model(path: &Path) -> Result<LoadedModel, ModelLoadError> {
    debug!(artifact_path = %path.display(), "Loading model artifact");

    let artifact = ModelArtifact::from_path(path)?;
    let classifier = artifact.build_classifier()?;

    let metadata = ModelMetadata {
        model_type: artifact.model_type,
        version: artifact.version,
        trained_at: artifact.trained_at,
        artifact_path: path.to_path_buf(),
    };

    info!(
        event = events::MODEL_LOADED,
        model_type = %metadata.model_type,
        model_version = %metadata.version,
        artifact_path = %path.display(),
        "Model artifact loaded"
    );

    Ok(LoadedModel {
        classifier: Arc::new(classifier),
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn artifact() -> ModelArtifact {
        ModelArtifact {
            model_type: LOGISTIC_REGRESSION_MODEL_TYPE.to_string(),
            version: "test".to_string(),
            trained_at: None,
            feature_names: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
            coefficients: vec![0.01; FEATURE_COUNT],
            intercept: -0.5,
        }
    }

    fn write_artifact(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_valid_artifact() {
        let file = write_artifact(&serde_json::to_string(&artifact()).unwrap());
        let loaded = load_model(file.path()).unwrap();
        assert_eq!(loaded.metadata.version, "test");
        assert_eq!(loaded.classifier.name(), "logistic_regression");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = load_model(Path::new("/definitely/not/here/model.json"));
        assert!(matches!(result, Err(ModelLoadError::NotFound { .. })));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let file = write_artifact("\u{1f}not json at all");
        assert!(matches!(
            load_model(file.path()),
            Err(ModelLoadError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_swapped_columns_are_rejected() {
        let mut swapped = artifact();
        swapped.feature_names.swap(0, 1);
        assert!(matches!(
            swapped.build_classifier(),
            Err(ModelLoadError::FeatureOrderMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_coefficient_count() {
        let mut short = artifact();
        short.coefficients.pop();
        assert!(matches!(
            short.build_classifier(),
            Err(ModelLoadError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_unknown_model_type() {
        let mut other = artifact();
        other.model_type = "random_forest".to_string();
        assert!(matches!(
            other.build_classifier(),
            Err(ModelLoadError::UnsupportedModelType(name)) if name == "random_forest"
        ));
    }
}
