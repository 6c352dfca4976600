//! # Tracing Module
//!
//! Environment-aware console logging using the tracing ecosystem, with optional
//! OpenTelemetry export of spans and metrics.
//!
//! This module provides:
//! - Console logging to stdout (container-friendly), pretty or JSON
//! - Environment-based log level configuration
//! - TTY-aware ANSI color output
//! - OpenTelemetry OTLP export for distributed tracing and metrics
//! - The `log_prediction!` structured event macro
//!
//! ## Trace ids
//!
//! Every HTTP request runs inside an `http_request` span. When OpenTelemetry is
//! enabled the span joins the caller's W3C trace (via `traceparent`) or starts a
//! new one, and its 128-bit trace id is what appears in logs and error bodies.
//! Without OpenTelemetry a random id of the same shape is generated per request.
//!
//! ## Configuration
//!
//! ```bash
//! # Enable OpenTelemetry
//! export TELEMETRY_ENABLED=true
//!
//! # OTLP endpoint (default: http://localhost:4317)
//! export OTEL_EXPORTER_OTLP_ENDPOINT=http://localhost:4317
//!
//! # Service identification
//! export OTEL_SERVICE_NAME=heart-risk-api
//! export OTEL_SERVICE_VERSION=0.1.0
//!
//! # Sampling rate (0.0 to 1.0, default: 1.0 = 100%)
//! export OTEL_TRACES_SAMPLER_ARG=1.0
//!
//! # JSON log lines instead of human-readable output
//! export LOG_FORMAT=json
//! ```

use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::metrics;

use opentelemetry::{trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    propagation::TraceContextPropagator,
    trace::{Sampler, SdkTracerProvider},
    Resource,
};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();
/// Store TracerProvider handle for proper shutdown
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Configuration for OpenTelemetry (loaded from environment or defaults)
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub service_name: String,
    pub service_version: String,
    pub deployment_environment: String,
    pub otlp_endpoint: String,
    pub sample_rate: f64,
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: std::env::var("TELEMETRY_ENABLED")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
            service_name: std::env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "heart-risk-api".to_string()),
            service_version: std::env::var("OTEL_SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            deployment_environment: std::env::var("DEPLOYMENT_ENVIRONMENT")
                .unwrap_or_else(|_| get_environment()),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            sample_rate: std::env::var("OTEL_TRACES_SAMPLER_ARG")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1.0),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
        }
    }
}

impl TelemetryConfig {
    /// Resource attributes shared by traces and metrics
    pub(crate) fn resource(&self) -> Resource {
        Resource::builder()
            .with_service_name(self.service_name.clone())
            .with_attributes([
                KeyValue::new("service.version", self.service_version.clone()),
                KeyValue::new(
                    "deployment.environment",
                    self.deployment_environment.clone(),
                ),
            ])
            .build()
    }

    fn sampler(&self) -> Sampler {
        if self.sample_rate >= 1.0 {
            Sampler::AlwaysOn
        } else if self.sample_rate <= 0.0 {
            Sampler::AlwaysOff
        } else {
            Sampler::TraceIdRatioBased(self.sample_rate)
        }
    }
}

/// Initialize OpenTelemetry tracer provider
///
/// Creates a TracerProvider configured with the OTLP exporter and registers the
/// W3C trace-context propagator used to continue incoming traces.
fn init_opentelemetry_tracer(
    config: &TelemetryConfig,
) -> Result<SdkTracerProvider, Box<dyn std::error::Error>> {
    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    // Batch processor keeps export off the request path
    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(config.resource())
        .with_sampler(config.sampler())
        .build();

    opentelemetry::global::set_tracer_provider(tracer_provider.clone());
    let _ = TRACER_PROVIDER.set(tracer_provider.clone());

    Ok(tracer_provider)
}

/// Initialize tracing with console output and optional OpenTelemetry
///
/// Safe to call more than once; only the first call installs a subscriber.
///
/// # Safety
///
/// **IMPORTANT**: When telemetry is enabled this must be called from within a
/// Tokio runtime, the OTLP/gRPC exporters need one.
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let telemetry_config = TelemetryConfig::default();

        let use_ansi = IsTerminal::is_terminal(&std::io::stdout());

        let console_layer = if telemetry_config.json_logs {
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true)
                .with_filter(EnvFilter::new(&log_level))
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(use_ansi)
                .with_filter(EnvFilter::new(&log_level))
                .boxed()
        };

        let mut tracer_error = None;
        let telemetry_layer = if telemetry_config.enabled {
            match init_opentelemetry_tracer(&telemetry_config) {
                Ok(provider) => Some(
                    tracing_opentelemetry::layer().with_tracer(provider.tracer("heart-risk-api")),
                ),
                Err(e) => {
                    tracer_error = Some(e.to_string());
                    None
                }
            }
        } else {
            None
        };
        let opentelemetry_enabled = telemetry_layer.is_some();

        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(telemetry_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else if let Some(error) = tracer_error {
            tracing::warn!(
                environment = %environment,
                error = %error,
                "Failed to initialize OpenTelemetry tracer - falling back to console-only logging"
            );
        } else {
            tracing::info!(
                environment = %environment,
                ansi_colors = use_ansi,
                json_logs = telemetry_config.json_logs,
                opentelemetry_enabled,
                otlp_endpoint = %telemetry_config.otlp_endpoint,
                service_name = %telemetry_config.service_name,
                "Console logging initialized"
            );
        }

        metrics::init_metrics(&telemetry_config);
    });
}

/// Shutdown OpenTelemetry gracefully
///
/// Flushes pending spans and metrics. Call before process exit.
pub fn shutdown_telemetry() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.force_flush() {
            tracing::warn!("Failed to flush tracer provider: {}", e);
        }
    }

    metrics::shutdown_metrics();

    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            tracing::error!("Failed to shutdown tracer provider: {}", e);
        }
    }
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("HEART_RISK_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment variables or environment defaults
fn get_log_level(environment: &str) -> String {
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        return level.to_lowercase();
    }

    if let Ok(level) = std::env::var("RUST_LOG") {
        return level.to_lowercase();
    }

    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log a prediction-path event with the trace id first
///
/// Crate-internal; import with `use crate::logging::log_prediction`.
///
/// ```rust,ignore
/// log_prediction!(info, events::PREDICTION_SUCCESS, trace_id: trace_id,
///     result: "Yes", latency_ms: 1.25);
/// ```
macro_rules! log_prediction {
    // Event with trace id and additional fields
    ($level:ident, $event:expr, trace_id: $trace_id:expr, $($key:ident: $value:expr),* $(,)?) => {
        ::tracing::$level!(
            event = %$event,
            trace_id = %$trace_id,
            $($key = %$value,)*
            timestamp = %::chrono::Utc::now().to_rfc3339(),
            "{}", $event
        );
    };
    // Simple form - event and trace id only
    ($level:ident, $event:expr, trace_id: $trace_id:expr $(,)?) => {
        ::tracing::$level!(
            event = %$event,
            trace_id = %$trace_id,
            timestamp = %::chrono::Utc::now().to_rfc3339(),
            "{}", $event
        );
    };
}

pub(crate) use log_prediction;
