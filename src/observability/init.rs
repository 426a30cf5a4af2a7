//! Tracing subscriber setup.

use super::exporter;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default trace file name inside the data directory.
pub const TRACE_FILE_NAME: &str = "eventsync-otlp.json";

/// Installs the global subscriber: an `EnvFilter` plus an OpenTelemetry layer
/// exporting to a rotating OTLP-JSON file.
///
/// The filter comes from `config.trace_level`, then `RUST_LOG`, then `info`.
/// Spans go to `config.trace_file`, or to [`TRACE_FILE_NAME`] in the data
/// directory.
///
/// Observability is optional: if the trace directory cannot be created this
/// returns without installing anything, and calling it again after a
/// subscriber is installed is a no-op.
///
/// # Example
///
/// ```rust
/// use eventsync::observability::init_tracing;
/// use eventsync::Config;
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     trace_file: Some(dir.path().join("trace.json")),
///     ..Config::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = match &config.trace_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let trace_file = trace_file_path(config);
    if let Some(parent) = trace_file.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    let resource = Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", exporter::SCOPE_NAME),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = exporter::file_tracer_provider(trace_file, resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(exporter::SCOPE_NAME));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();
}

fn trace_file_path(config: &Config) -> PathBuf {
    config
        .trace_file
        .clone()
        .unwrap_or_else(|| crate::infrastructure::data_dir().join(TRACE_FILE_NAME))
}
