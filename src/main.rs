//! Round-robin reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request     ┌──────────┐    ┌────────────┐    ┌──────────┐
//!     ──────────────────▶│  server  │───▶│ dispatcher │───▶│ registry │
//!                        │ (axum)   │    │            │◀───│ (cursor) │
//!                        └──────────┘    └─────┬──────┘    └──────────┘
//!                                              │ backend.forwarder()
//!                                              ▼
//!     Client Response    ┌──────────┐    ┌────────────┐
//!     ◀──────────────────│ headers  │◀───│  forward   │◀──────── Backend
//!                        └──────────┘    └────────────┘
//! ```
//!
//! Exit status is non-zero when configuration is invalid or when in-flight
//! requests outlive the shutdown grace period.

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;

use round_robin_proxy::config::{resolve_config, ProxyConfig};
use round_robin_proxy::lifecycle::{build_registry, drain, shutdown_signal, Shutdown};
use round_robin_proxy::observability::{logging, metrics};
use round_robin_proxy::HttpServer;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let _ = logging::init("info");
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.observability.log_level) {
        eprintln!("failed to initialise logging: {e}");
    }

    match run(config).await {
        Ok(()) => {
            tracing::info!("Server exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server terminated abnormally");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ProxyConfig) -> Result<(), Box<dyn Error>> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "round-robin-proxy starting");

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let registry = Arc::new(build_registry(&config)?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let grace = config.shutdown.grace_period();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = registry.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, registry);
    let mut handle = tokio::spawn(server.run(listener, shutdown.signalled()));

    tokio::select! {
        _ = shutdown_signal() => {}
        joined = &mut handle => {
            // The server stopped without being asked to.
            joined??;
            return Ok(());
        }
    }

    tracing::info!(grace = ?grace, "Shutting down server...");
    shutdown.trigger();
    drain(handle, grace).await?;
    Ok(())
}
