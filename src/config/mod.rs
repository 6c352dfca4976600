//! # Service Configuration
//!
//! Environment-aware YAML configuration for the prediction service.
//!
//! ## Architecture
//!
//! - **Single file**: `config/heart-risk.yaml` holds the base settings
//! - **Environment sections**: optional `development`, `test` and `production`
//!   sections are deep-merged over the base for the active environment
//! - **Explicit overrides**: a small set of `HEART_RISK_*` variables win last
//! - **Explicit validation**: invalid values fail startup instead of falling back
//!
//! ## Usage
//!
//! ```rust,no_run
//! use heart_risk::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let bind_address = &manager.config().server.bind_address;
//! let artifact = &manager.config().model.artifact_path;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring heart-risk.yaml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeartRiskConfig {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Model artifact location
    pub model: ModelConfig,

    /// Readiness gating
    pub readiness: ReadinessConfig,

    /// Request validation policy
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Whole-request timeout; expired requests get 408
    pub request_timeout_ms: u64,
    /// Grace period for in-flight requests after a shutdown signal
    pub shutdown_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            request_timeout_ms: 30_000,
            shutdown_timeout_ms: 10_000,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub artifact_path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("models/model.json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Minimum wait before the warm-up inference runs
    pub warmup_delay_ms: u64,
}

impl ReadinessConfig {
    pub fn warmup_delay(&self) -> Duration {
        Duration::from_millis(self.warmup_delay_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject values outside the documented clinical ranges
    pub enforce_domain_ranges: bool,
}

impl HeartRiskConfig {
    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "server.bind_address",
                "",
                "bind address must not be empty",
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "server.request_timeout_ms",
                "0",
                "request timeout must be greater than 0",
            ));
        }

        if self.model.artifact_path.as_os_str().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "model.artifact_path",
                "",
                "artifact path must not be empty",
            ));
        }

        Ok(())
    }
}
