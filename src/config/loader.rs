//! Configuration Loader
//!
//! Environment-aware configuration loading. Handles YAML file discovery,
//! environment detection, section merging and `HEART_RISK_*` overrides.

use super::error::{ConfigResult, ConfigurationError};
use super::HeartRiskConfig;
use serde_yaml::Value as YamlValue;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Environments that may carry override sections in the config file
const ENVIRONMENT_SECTIONS: [&str; 3] = ["development", "test", "production"];

/// Loaded configuration plus where it came from
#[derive(Debug)]
pub struct ConfigManager {
    config: HeartRiskConfig,
    environment: String,
    config_file: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment.
    /// Process environment overrides are still applied.
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        Self::load_with_overrides(config_dir, environment, |key| env::var(key).ok())
    }

    /// Load configuration resolving overrides through `lookup`.
    /// Useful for testing without modifying global environment variables.
    pub fn load_with_overrides<F>(
        config_dir: Option<PathBuf>,
        environment: &str,
        lookup: F,
    ) -> ConfigResult<Arc<ConfigManager>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_directory = config_dir
            .or_else(|| lookup("HEART_RISK_CONFIG_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("config"));

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let config_file = Self::find_config_file(&config_directory);
        let mut config = match &config_file {
            Some(path) => Self::load_and_merge_config(path, environment)?,
            None => {
                warn!(
                    config_directory = %config_directory.display(),
                    "No configuration file found, using built-in defaults"
                );
                HeartRiskConfig::default()
            }
        };

        Self::apply_environment_overrides(&mut config, &lookup)?;
        config.validate()?;

        info!(
            environment = environment,
            bind_address = %config.server.bind_address,
            artifact_path = %config.model.artifact_path.display(),
            enforce_domain_ranges = config.validation.enforce_domain_ranges,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_file,
        }))
    }

    /// Wrap an already-built configuration (tests and embedding)
    pub fn from_config(config: HeartRiskConfig, environment: &str) -> ConfigResult<Arc<Self>> {
        config.validate()?;
        Ok(Arc::new(Self {
            config,
            environment: environment.to_string(),
            config_file: None,
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &HeartRiskConfig {
        &self.config
    }

    /// Get the current environment
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// File the configuration was read from, if any
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Detect current environment from environment variables
    pub fn detect_environment() -> String {
        env::var("HEART_RISK_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }

    fn find_config_file(config_directory: &Path) -> Option<PathBuf> {
        ["heart-risk.yaml", "heart-risk.yml"]
            .iter()
            .map(|name| config_directory.join(name))
            .find(|path| path.exists())
    }

    /// Safely read a configuration file with a size limit
    fn read_config_file_safely(path: &Path) -> ConfigResult<String> {
        const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024; // 1MB limit

        let metadata = std::fs::metadata(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))?;

        if !metadata.is_file() {
            return Err(ConfigurationError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigurationError::invalid_value(
                "file_size",
                metadata.len().to_string(),
                format!("Configuration file larger than {MAX_CONFIG_FILE_SIZE} bytes"),
            ));
        }

        std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))
    }

    fn load_and_merge_config(config_file: &Path, environment: &str) -> ConfigResult<HeartRiskConfig> {
        let yaml_content = Self::read_config_file_safely(config_file)?;

        let mut yaml_data: YamlValue = serde_yaml::from_str(&yaml_content)
            .map_err(|e| ConfigurationError::invalid_yaml(config_file.display().to_string(), e))?;

        // An empty file parses to null; treat it as an empty mapping
        if yaml_data.is_null() {
            yaml_data = YamlValue::Mapping(Default::default());
        }

        if let Some(env_overrides) = yaml_data
            .get(YamlValue::String(environment.to_string()))
            .cloned()
        {
            debug!(
                "Applying environment-specific overrides for: {}",
                environment
            );
            Self::merge_yaml_values(&mut yaml_data, env_overrides);
        }

        // Remove environment sections so they don't reach deserialization
        if let YamlValue::Mapping(ref mut map) = yaml_data {
            for section in ENVIRONMENT_SECTIONS {
                map.remove(YamlValue::String(section.to_string()));
            }
        }

        serde_yaml::from_value(yaml_data).map_err(|e| {
            ConfigurationError::invalid_yaml(
                config_file.display().to_string(),
                format!("Failed to deserialize configuration: {e}"),
            )
        })
    }

    /// Recursively merge YAML values (environment overrides into base config)
    fn merge_yaml_values(base: &mut YamlValue, override_value: YamlValue) {
        match (&mut *base, override_value) {
            (YamlValue::Mapping(base_map), YamlValue::Mapping(override_map)) => {
                for (key, value) in override_map {
                    if let Some(existing_value) = base_map.get_mut(&key) {
                        Self::merge_yaml_values(existing_value, value);
                    } else {
                        base_map.insert(key, value);
                    }
                }
            }
            (base_ref, override_val) => {
                // For non-mapping values, override completely
                *base_ref = override_val;
            }
        }
    }

    fn apply_environment_overrides<F>(config: &mut HeartRiskConfig, lookup: &F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind_address) = lookup("HEART_RISK_BIND_ADDRESS") {
            debug!("Overriding server.bind_address from HEART_RISK_BIND_ADDRESS");
            config.server.bind_address = bind_address;
        }

        if let Some(model_path) = lookup("HEART_RISK_MODEL_PATH") {
            debug!("Overriding model.artifact_path from HEART_RISK_MODEL_PATH");
            config.model.artifact_path = PathBuf::from(model_path);
        }

        if let Some(enforce) = lookup("HEART_RISK_ENFORCE_DOMAIN_RANGES") {
            config.validation.enforce_domain_ranges = match enforce.to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => {
                    return Err(ConfigurationError::environment_override(
                        "HEART_RISK_ENFORCE_DOMAIN_RANGES",
                        format!("expected a boolean, got '{other}'"),
                    ))
                }
            };
        }

        Ok(())
    }
}
