//! # Service Bootstrap
//!
//! Brings the prediction service up in a fixed order:
//!
//! 1. Load configuration (environment-aware, see [`ConfigManager`])
//! 2. Load the model artifact, failing fast when it is unusable
//! 3. Build the shared web state and bind the listener
//! 4. Spawn the warm-up task that gates readiness
//!
//! The returned [`ServiceHandle`] owns the server task and performs graceful
//! shutdown bounded by the configured shutdown timeout.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::ConfigManager;
use crate::constants::events::{WARMUP_COMPLETED, WARMUP_FAILED};
use crate::error::{HeartRiskError, Result};
use crate::health::HealthState;
use crate::inference::{load_model, reference_record, InferenceService, LoadedModel};
use crate::web::{self, AppState};

/// Running service with lifecycle control
#[derive(Debug)]
pub struct ServiceHandle {
    pub state: Arc<AppState>,
    pub config_manager: Arc<ConfigManager>,
    /// Address the listener actually bound, useful with port 0
    pub local_addr: SocketAddr,
    shutdown_sender: Option<oneshot::Sender<()>>,
    server_task: JoinHandle<std::io::Result<()>>,
    warmup_task: JoinHandle<()>,
    shutdown_timeout: Duration,
}

impl ServiceHandle {
    pub fn is_running(&self) -> bool {
        self.shutdown_sender.is_some() && !self.server_task.is_finished()
    }

    /// Serve until `signal` resolves, then shut down gracefully
    ///
    /// Returns an error if the server stops on its own before the signal.
    pub async fn run_until<F>(mut self, signal: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            () = signal => {
                info!("Shutdown signal received, initiating graceful shutdown");
            }
            result = &mut self.server_task => {
                self.warmup_task.abort();
                return match result {
                    Ok(Ok(())) => Err(HeartRiskError::Server(
                        "Web server exited unexpectedly".to_string(),
                    )),
                    Ok(Err(e)) => Err(HeartRiskError::Server(format!("Web server error: {e}"))),
                    Err(e) => Err(HeartRiskError::Server(format!("Web server task failed: {e}"))),
                };
            }
        }

        self.shutdown().await
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(sender) = self.shutdown_sender.take() {
            // Receiver is gone only if the server already exited
            let _ = sender.send(());
        } else {
            warn!("Service already stopped");
        }
        self.warmup_task.abort();

        let outcome = tokio::time::timeout(self.shutdown_timeout, &mut self.server_task).await;
        match outcome {
            Ok(Ok(Ok(()))) => {
                info!("Web server stopped");
                Ok(())
            }
            Ok(Ok(Err(e))) => Err(HeartRiskError::Server(format!("Web server error: {e}"))),
            Ok(Err(e)) => Err(HeartRiskError::Server(format!(
                "Web server task failed: {e}"
            ))),
            Err(_) => {
                warn!(
                    shutdown_timeout_ms = self.shutdown_timeout.as_millis() as u64,
                    "Graceful shutdown timed out, aborting in-flight requests"
                );
                self.server_task.abort();
                Ok(())
            }
        }
    }
}

/// Bootstrap entry points
#[derive(Debug)]
pub struct ServiceBootstrap;

impl ServiceBootstrap {
    /// Bootstrap using configuration discovered from the environment
    pub async fn bootstrap() -> Result<ServiceHandle> {
        let config_manager = ConfigManager::load()?;
        Self::bootstrap_with_config(config_manager).await
    }

    /// Bootstrap with an already loaded configuration
    pub async fn bootstrap_with_config(config_manager: Arc<ConfigManager>) -> Result<ServiceHandle> {
        let config = config_manager.config();

        info!(
            environment = %config_manager.environment(),
            artifact_path = %config.model.artifact_path.display(),
            "BOOTSTRAP: Loading model artifact"
        );
        let model = load_model(&config.model.artifact_path)?;

        Self::bootstrap_with_model(config_manager, model).await
    }

    /// Bootstrap around a model that is already loaded
    pub async fn bootstrap_with_model(
        config_manager: Arc<ConfigManager>,
        model: LoadedModel,
    ) -> Result<ServiceHandle> {
        let config = config_manager.config();

        let health = Arc::new(HealthState::new());
        let inference = InferenceService::new(model.classifier);
        let state = Arc::new(AppState::new(
            config,
            inference.clone(),
            Some(model.metadata),
            health.clone(),
        ));

        let bind_address = config.server.bind_address.clone();
        let listener = tokio::net::TcpListener::bind(&bind_address)
            .await
            .map_err(|e| HeartRiskError::Startup(format!("Failed to bind to {bind_address}: {e}")))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| HeartRiskError::Startup(format!("Failed to read local address: {e}")))?;

        let app = web::create_app(state.clone());
        let (shutdown_sender, shutdown_receiver) = oneshot::channel::<()>();

        let server_task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_receiver.await;
                })
                .await
        });

        let warmup_task = tokio::spawn(run_warmup(
            health,
            inference,
            config.readiness.warmup_delay(),
        ));

        info!(
            local_addr = %local_addr,
            "BOOTSTRAP: Web server listening, readiness pending warm-up"
        );

        Ok(ServiceHandle {
            state,
            config_manager: config_manager.clone(),
            local_addr,
            shutdown_sender: Some(shutdown_sender),
            server_task,
            warmup_task,
            shutdown_timeout: config.server.shutdown_timeout(),
        })
    }
}

/// Wait `delay`, then score the reference record once
///
/// Success marks the service ready. Failure marks it not alive so the
/// orchestrator restarts the process.
pub async fn run_warmup(health: Arc<HealthState>, inference: InferenceService, delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    match inference.predict(&reference_record()) {
        Ok(result) => {
            if health.mark_ready() {
                info!(
                    event = WARMUP_COMPLETED,
                    model = inference.model_name(),
                    probability = result.probability,
                    predicted_class = %result.predicted_class,
                    uptime_seconds = health.uptime_seconds(),
                    "Warm-up inference succeeded, service is ready"
                );
            }
        }
        Err(e) => {
            health.mark_not_alive();
            error!(
                event = WARMUP_FAILED,
                model = inference.model_name(),
                error = %e,
                "Warm-up inference failed, service marked not alive"
            );
        }
    }
}
