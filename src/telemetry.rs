//! Logging and trace export initialization
//!
//! Installs a `tracing` subscriber made of an env filter, a console formatter
//! and, when enabled, a `tracing-opentelemetry` layer exporting spans over
//! OTLP/HTTP. The tracer provider is returned to the caller instead of being
//! registered globally, so request handling never depends on process-wide
//! telemetry state.

use std::time::Duration;

use anyhow::{Context, Result};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use opentelemetry_sdk::{
    Resource,
    trace::{BatchConfigBuilder, BatchSpanProcessor, Sampler, SdkTracerProvider},
};
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingConfig, TelemetryConfig};

/// Keeps the tracer provider alive and flushes it on shutdown
#[must_use = "dropping the guard without calling shutdown loses buffered spans"]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Flush pending spans and stop the exporter
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(e) = provider.shutdown() {
                tracing::error!("Failed to shut down tracer provider: {e}");
            }
        }
    }
}

fn build_provider(cfg: &TelemetryConfig) -> Result<SdkTracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(cfg.otlp_endpoint.clone())
        .build()
        .with_context(|| format!("Failed to build OTLP exporter for {}", cfg.otlp_endpoint))?;

    let batch_config = BatchConfigBuilder::default()
        .with_scheduled_delay(Duration::from_millis(cfg.batch_timeout_ms))
        .with_max_export_batch_size(cfg.max_export_batch_size)
        .build();

    let processor = BatchSpanProcessor::builder(exporter)
        .with_batch_config(batch_config)
        .build();

    let resource = Resource::builder_empty()
        .with_attribute(opentelemetry::KeyValue::new(
            SERVICE_NAME,
            cfg.service_name.clone(),
        ))
        .build();

    Ok(SdkTracerProvider::builder()
        .with_span_processor(processor)
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(resource)
        .build())
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(logging: &LoggingConfig, telemetry: &TelemetryConfig) -> Result<TelemetryGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;

    let fmt_layer = match logging.format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().boxed(),
        _ => tracing_subscriber::fmt::layer().boxed(),
    };

    let provider = if telemetry.enabled {
        Some(build_provider(telemetry)?)
    } else {
        None
    };

    let otel_layer = provider.as_ref().map(|provider| {
        let tracer = provider.tracer(telemetry.service_name.clone());
        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .with_context(|| "Failed to install tracing subscriber")?;

    tracing::info!(
        service = %telemetry.service_name,
        export = telemetry.enabled,
        endpoint = %telemetry.otlp_endpoint,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard { provider })
}
