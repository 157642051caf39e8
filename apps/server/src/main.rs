//! `patient-api` binary
//!
//! Usage:
//!   patient-api [--config <path>] [--port <port>]

use anyhow::Context;
use clap::Parser;
use patient_api::{api::create_router, config::Config, logging, state::AppState};
use std::{net::SocketAddr, path::PathBuf};

#[derive(Parser, Debug)]
#[clap(name = "patient-api")]
#[clap(about = "Patient records with FHIR-style birth date search", version)]
struct Args {
    /// Configuration file (toml, yaml or json); defaults to ./config.* when present
    #[clap(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Listen port, overriding the configured value
    #[clap(short, long)]
    port: Option<u16>,
}

impl Args {
    /// Layered config with command-line overrides applied last.
    fn into_config(self) -> anyhow::Result<Config> {
        let mut config =
            Config::load_from(self.config.as_deref()).context("Failed to load configuration")?;
        if let Some(port) = self.port {
            config.server.port = port;
        }
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;

    // Dropped on return, which flushes file logs and pending spans.
    let _telemetry =
        logging::init_logging(&config.logging).context("Failed to initialize logging/telemetry")?;

    let addr = config
        .socket_addr()
        .context("Failed to determine socket address")?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.logging.deployment_environment,
        storage = ?config.storage.backend,
        %addr,
        "Starting Patient API"
    );

    let state = AppState::new(config)
        .await
        .context("Failed to initialize application state")?;

    serve(addr, state).await
}

async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener on {addr}"))?;
    tracing::info!("Listening on http://{addr} (patients under /api/patients)");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated unexpectedly")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves on SIGTERM or Ctrl+C.
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    let received = tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    tracing::info!(signal = received, "Starting graceful shutdown");
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!(signal = "ctrl-c", "Starting graceful shutdown"),
        Err(e) => tracing::warn!(error = %e, "Failed to listen for Ctrl+C"),
    }
}
