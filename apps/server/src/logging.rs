//! Subscriber setup for the patient API
//!
//! Console output is JSON or human-readable, optionally mirrored to a rolling
//! file. When enabled, spans are exported over OTLP so request traces carry a
//! trace id that the request-id middleware echoes back to clients.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{Config as TraceConfig, Sampler, TracerProvider};
use opentelemetry_sdk::Resource;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Held by `main` for the process lifetime. Dropping it flushes the file
/// writer and shuts the tracer provider down.
pub struct TelemetryGuard {
    _file_guard: Option<WorkerGuard>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        shutdown_telemetry();
    }
}

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over `config.level`. An OTLP exporter that
/// fails to start is reported once the subscriber is up and otherwise ignored.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<TelemetryGuard> {
    let mut layers: Vec<BoxedLayer> = vec![console_layer(config.json)];

    let file_guard = if config.file_enabled {
        std::fs::create_dir_all(&config.file_directory)?;
        let appender = RollingFileAppender::new(
            rotation(&config.file_rotation),
            &config.file_directory,
            log_file_name(config),
        );
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(if config.json {
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(writer)
                .boxed()
        } else {
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .boxed()
        });
        Some(guard)
    } else {
        None
    };

    let exporter_error = if config.opentelemetry_enabled {
        match tracer_provider(config) {
            Ok(provider) => {
                layers.push(
                    tracing_opentelemetry::layer()
                        .with_tracer(provider.tracer("patient-api"))
                        .with_tracked_inactivity(true)
                        .boxed(),
                );
                global::set_tracer_provider(provider);
                None
            }
            Err(err) => Some(err),
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter(&config.level))
        .try_init()?;

    if let Some(err) = exporter_error {
        tracing::warn!(error = %err, "OTLP exporter unavailable, spans will not be exported");
    }

    tracing::info!(
        level = %config.level,
        json = config.json,
        file = config.file_enabled,
        otel = config.opentelemetry_enabled,
        service = %config.service_name,
        environment = %config.deployment_environment,
        "Logging ready"
    );

    Ok(TelemetryGuard {
        _file_guard: file_guard,
    })
}

/// Flush and shut down the global tracer provider.
pub fn shutdown_telemetry() {
    global::shutdown_tracer_provider();
}

fn console_layer(json: bool) -> BoxedLayer {
    if json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stdout)
            .boxed()
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn default_directives(level: &str) -> String {
    format!("patient_api={level},patient_date_search={level},tower_http=info,sqlx=warn")
}

fn rotation(name: &str) -> Rotation {
    match name.to_ascii_lowercase().as_str() {
        "minutely" => Rotation::MINUTELY,
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

/// With rotation off there is no date suffix, so give the file an extension.
fn log_file_name(config: &LoggingConfig) -> String {
    if rotation(&config.file_rotation) == Rotation::NEVER {
        format!("{}.log", config.file_prefix)
    } else {
        config.file_prefix.clone()
    }
}

fn sampler(ratio: f64) -> Sampler {
    match ratio {
        r if r >= 1.0 => Sampler::AlwaysOn,
        r if r <= 0.0 => Sampler::AlwaysOff,
        r => Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(r))),
    }
}

fn tracer_provider(config: &LoggingConfig) -> anyhow::Result<TracerProvider> {
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(&config.otlp_endpoint)
        .with_timeout(Duration::from_secs(config.otlp_timeout_seconds))
        .build_span_exporter()
        .map_err(|e| anyhow::anyhow!("Failed to create OTLP exporter: {e}"))?;

    let version = config
        .service_version
        .clone()
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    let resource = Resource::new([
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", version),
        KeyValue::new(
            "deployment.environment",
            config.deployment_environment.clone(),
        ),
    ]);

    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_config(
            TraceConfig::default()
                .with_sampler(sampler(config.trace_sample_ratio))
                .with_resource(resource),
        )
        .build())
}
