//! # Web State
//!
//! Shared state handed to every handler. Everything here is either immutable
//! after startup or synchronized internally, so the state is shared as a plain
//! `Arc` without locks.

use std::sync::Arc;

use crate::config::{HeartRiskConfig, ServerConfig};
use crate::health::HealthState;
use crate::inference::{InferenceService, ModelMetadata};
use crate::validation::RequestValidator;

/// Shared state for the prediction web API
#[derive(Debug)]
pub struct AppState {
    /// Liveness and readiness flags, also written by the warm-up task
    pub health: Arc<HealthState>,

    /// Invoker around the process-wide classifier
    pub inference: InferenceService,

    pub validator: RequestValidator,

    /// Describes the loaded artifact, `None` for classifiers built in code
    pub model: Option<ModelMetadata>,

    pub server: ServerConfig,
}

impl AppState {
    /// Build state from the service configuration and a ready-to-use model
    pub fn new(
        config: &HeartRiskConfig,
        inference: InferenceService,
        model: Option<ModelMetadata>,
        health: Arc<HealthState>,
    ) -> Self {
        Self {
            health,
            inference,
            validator: RequestValidator::new(config.validation.enforce_domain_ranges),
            model,
            server: config.server.clone(),
        }
    }
}
