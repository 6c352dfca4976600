//! # Heart Risk Prediction Server
//!
//! Thin wrapper binary for running the prediction API as a standalone server.
//!
//! ## Usage
//!
//! ```bash
//! # Run with default configuration (config/heart-risk.yaml)
//! cargo run --bin heart-risk-server
//!
//! # Run with a specific environment and artifact
//! HEART_RISK_ENV=production HEART_RISK_MODEL_PATH=/models/model.json \
//!     cargo run --release --bin heart-risk-server
//! ```

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};

use heart_risk::bootstrap::ServiceBootstrap;
use heart_risk::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    info!("Starting Heart Risk Prediction Server");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "   Build Mode: {}",
        if cfg!(debug_assertions) {
            "Debug"
        } else {
            "Release"
        }
    );

    let result = run().await;

    if let Err(e) = &result {
        error!(error = %format!("{e:#}"), "Fatal error, server exiting");
    }

    logging::shutdown_telemetry();
    info!("Heart Risk Prediction Server shutdown complete");

    result
}

async fn run() -> anyhow::Result<()> {
    let handle = ServiceBootstrap::bootstrap()
        .await
        .context("Failed to bootstrap prediction service")?;

    info!(
        environment = %handle.config_manager.environment(),
        local_addr = %handle.local_addr,
        model_version = handle
            .state
            .model
            .as_ref()
            .map(|m| m.version.as_str())
            .unwrap_or("unknown"),
        "Server started, press Ctrl+C to shutdown gracefully"
    );

    handle
        .run_until(shutdown_signal())
        .await
        .context("Prediction service stopped with an error")
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C");
        },
        () = terminate => {
            info!("Received SIGTERM");
        },
    }
}
