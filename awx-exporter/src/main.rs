//! AWX Job Exporter
//!
//! Polls the AWX jobs API on a fixed interval and republishes job counts per
//! organization, status and label set as Prometheus gauges.
//!
//! Architecture:
//! - Configuration: YAML file plus environment overrides, loaded once
//! - Repositories: where job records come from (AWX over HTTP)
//! - Scheduler: the fetch → whitelist → aggregate → publish loop
//! - API: `/metrics` scrape endpoint and `/health`

mod api;
mod config;
mod metrics;
mod repository;
mod scheduler;

use anyhow::{Context, Result};
use awx_client::AwxClient;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::metrics::JobMetrics;
use crate::repository::AwxJobRepository;
use crate::scheduler::{JobPoller, PollerConfig};

#[derive(Parser)]
#[command(name = "awx-exporter")]
#[command(about = "Prometheus exporter for AWX job counts", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, env = "AWX_EXPORTER_CONFIG", default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "awx_exporter=info,awx_client=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    info!("Starting AWX Job Exporter");

    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    log_config(&config);

    let client = AwxClient::new(
        config.awx.api_url.clone(),
        config.credentials(),
        config.request_timeout(),
    )
    .context("Failed to create AWX client")?;

    let metrics = Arc::new(JobMetrics::new().context("Failed to register metrics")?);
    let repository = Arc::new(AwxJobRepository::new(client));
    let poller = JobPoller::new(
        PollerConfig::from_config(&config),
        repository,
        Arc::clone(&metrics),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let poller_handle = {
        let shutdown_rx = shutdown_rx.clone();
        tokio::spawn(async move { poller.run(shutdown_rx).await })
    };

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("AWX Job Exporter listening on {}", addr);

    let app = api::create_router(metrics);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let mut rx = shutdown_rx;
        while !*rx.borrow() {
            if rx.changed().await.is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    server.await.context("HTTP server failed")?;

    if let Err(e) = poller_handle.await {
        warn!("Poller task panicked: {}", e);
    }

    info!("AWX Job Exporter stopped");
    Ok(())
}

/// Logs the loaded configuration without secrets
fn log_config(config: &Config) {
    let mut organizations: Vec<&String> = config.whitelist.organizations.iter().collect();
    organizations.sort();
    let mut labels: Vec<&String> = config.whitelist.labels.iter().collect();
    labels.sort();

    info!("Loaded configuration:");
    info!("  AWX API URL: {}", config.awx.api_url);
    info!("  Whitelist enabled: {}", config.whitelist.enabled);
    info!("  Whitelisted organizations: {:?}", organizations);
    info!("  Whitelisted labels: {:?}", labels);
    info!(
        "  Poll interval: {:?}, request timeout: {:?}, label order: {:?}",
        config.poll_interval(),
        config.request_timeout(),
        config.label_order()
    );

    if config.whitelist_rejects_everything() {
        warn!("Whitelist is enabled with no organizations or no labels; every job will be ignored");
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
