//! # OpenTelemetry Metrics Module
//!
//! Metrics are exported via OTLP when `TELEMETRY_ENABLED=true`. Otherwise the
//! global no-op meter provider stays in place and every instrument call is a
//! cheap no-op, so the request path never depends on a metrics backend.
//!
//! ## Usage
//!
//! ```rust
//! use heart_risk::metrics::inference;
//!
//! inference::prediction_latency().record(1.25, &[]);
//! ```
//!
//! Export interval is fixed at 60 seconds.

use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use std::sync::OnceLock;
use std::time::Duration;

use crate::logging::TelemetryConfig;

pub mod inference;

/// Global metrics initialization state
static METRICS_INITIALIZED: OnceLock<()> = OnceLock::new();
/// Store MeterProvider handle for proper shutdown
static METER_PROVIDER: OnceLock<SdkMeterProvider> = OnceLock::new();

const EXPORT_INTERVAL: Duration = Duration::from_secs(60);

/// Initialize OpenTelemetry MeterProvider with OTLP exporter and periodic reader
fn init_opentelemetry_meter(
    config: &TelemetryConfig,
) -> Result<SdkMeterProvider, Box<dyn std::error::Error>> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(EXPORT_INTERVAL)
        .build();

    let meter_provider = SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(config.resource())
        .build();

    Ok(meter_provider)
}

/// Initialize metrics collection with OpenTelemetry
///
/// Safe to call multiple times - subsequent calls are no-ops.
pub fn init_metrics(config: &TelemetryConfig) {
    METRICS_INITIALIZED.get_or_init(|| {
        if !config.enabled {
            tracing::debug!("Metrics collection disabled (TELEMETRY_ENABLED=false)");
            return;
        }

        match init_opentelemetry_meter(config) {
            Ok(meter_provider) => {
                opentelemetry::global::set_meter_provider(meter_provider.clone());
                let _ = METER_PROVIDER.set(meter_provider);
                inference::init();

                tracing::info!(
                    service_name = %config.service_name,
                    otlp_endpoint = %config.otlp_endpoint,
                    export_interval_seconds = EXPORT_INTERVAL.as_secs(),
                    "OpenTelemetry metrics initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to initialize OpenTelemetry metrics - metrics collection disabled"
                );
            }
        }
    });
}

/// Flush and shut down the meter provider, if one was installed
pub fn shutdown_metrics() {
    if let Some(provider) = METER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            tracing::warn!("Failed to shutdown meter provider: {}", e);
        }
    } else {
        tracing::debug!("Metrics shutdown requested - no meter provider installed");
    }
}
