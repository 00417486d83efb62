//! # DevEUI Worker
//!
//! Issues batches of unique LoRaWAN DevEUIs and registers each one with an
//! external onboarding service.
//!
//! - **Generator**: draws 8-byte DevEUIs from a pluggable random source,
//!   keeping their 5-character short forms unique within a batch
//! - **Processor**: registers a batch through a fixed pool of concurrent
//!   workers and fans results back into success and failure streams
//! - **Issuer**: regenerates the shortfall until a target count is registered
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │                             DevEUI Worker                             │
//! ├───────────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌──────────────┐  │
//! │  │ API / CLI   │→ │  Service    │→ │  Registrar  │→ │  Onboarding  │  │
//! │  │ (Axum/clap) │  │  Layer      │  │  Layer      │  │  endpoint    │  │
//! │  └─────────────┘  └─────────────┘  └─────────────┘  └──────────────┘  │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod registrar;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::create_router;
use crate::api::state::AppState;
use crate::config::AppConfig;
use crate::registrar::create_registrar;
use crate::service::{Generator, IssueReport, Issuer, Processor, RngSource};

/// Longest time in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

/// Run the HTTP server.
///
/// This function:
/// 1. Installs the metrics recorder (if enabled)
/// 2. Builds the registrar and application state
/// 3. Starts the HTTP server
/// 4. Handles graceful shutdown, aborting requests still running after a minute
///
/// # Errors
///
/// Returns an error if:
/// - The registrar fails to initialize
/// - The metrics recorder cannot be installed
/// - HTTP server fails to bind
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting DevEUI worker server"
    );

    let metrics = install_metrics(&config)?;

    let config = Arc::new(config);
    let state = AppState::new(Arc::clone(&config), metrics)?;
    info!(
        registrar = state.registrar.backend_name(),
        batch_size = config.issuance.batch_size,
        workers = config.issuance.workers,
        "Registrar initialized"
    );

    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    serve_until(listener, app, shutdown_signal(), SHUTDOWN_TIMEOUT).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Serve `app` until `signal` resolves, then drain for at most `deadline`.
async fn serve_until(
    listener: TcpListener,
    app: Router,
    signal: impl Future<Output = ()> + Send,
    deadline: Duration,
) -> anyhow::Result<()> {
    let draining = CancellationToken::new();
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(draining.clone().cancelled_owned())
            .into_future(),
    );

    tokio::select! {
        result = &mut server => return Ok(result??),
        () = signal => {}
    }

    draining.cancel();
    if let Ok(result) = tokio::time::timeout(deadline, &mut server).await {
        result??;
    } else {
        warn!(?deadline, "Shutdown deadline reached, aborting in-flight requests");
        server.abort();
    }

    Ok(())
}

/// Register `config.issuance.target` fresh DevEUIs.
///
/// Runs until the target is met or a shutdown signal arrives, in which case
/// the DevEUIs registered so far are returned.
///
/// # Errors
///
/// Returns an error if the registrar fails to initialize or the issuer
/// rejects the configuration.
pub async fn issue(config: &AppConfig) -> anyhow::Result<IssueReport> {
    let registrar = create_registrar(&config.registrar)?;
    info!(
        registrar = registrar.backend_name(),
        wanted = config.issuance.target,
        workers = config.issuance.workers,
        accept_already_registered = config.registrar.accept_already_registered,
        "Starting DevEUI issuance"
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        on_signal.cancel();
    });

    let issuer = Issuer::new(
        Processor::new(registrar, config.issuance.workers),
        config.issuance.retry_backoff(),
    );
    let mut generator = Generator::new(RngSource::os());

    let report = issuer
        .issue(config.issuance.target, &mut generator, &cancel)
        .await?;

    Ok(report)
}

/// Initialize logging based on configuration.
///
/// Logs go to stderr so stdout stays reserved for issued DevEUIs.
pub fn init_logging(config: &AppConfig) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.observability.log_format == "json" {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Install the global Prometheus recorder when metrics are enabled.
fn install_metrics(config: &AppConfig) -> anyhow::Result<Option<PrometheusHandle>> {
    if !config.observability.metrics_enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(Some(handle))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
