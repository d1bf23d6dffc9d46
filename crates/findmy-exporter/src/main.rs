//! findmy-exporter — Find My device location exporter.
//!
//! Loads the device list once from the locator bridge, then serves
//! per-device location gauges on `/metrics`, querying every device afresh
//! on each scrape.
//!
//! # Usage
//!
//! ```text
//! LOCATOR_URL=http://127.0.0.1:9825 findmy-exporter --port 9824
//! ```

mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use findmy_client::BridgeClient;
use findmy_core::DeviceRegistry;
use findmy_metrics::DeviceCollector;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // RUST_LOG wins over LOG_LEVEL when set.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    run(config).await
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!(
        locator = %config.locator_url,
        timeout_secs = config.location_timeout.as_secs_f64(),
        "Find My exporter starting"
    );

    let client = Arc::new(BridgeClient::new(&config.locator_url).context("invalid locator url")?);

    // Must succeed before the port is bound.
    let registry = DeviceRegistry::load(client.as_ref())
        .await
        .context("failed to load device registry")?;

    let collector = Arc::new(DeviceCollector::new(
        Arc::new(registry),
        client,
        config.location_timeout,
    ));
    let router = findmy_api::build_router(collector);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    let addr = listener.local_addr()?;

    info!("Prometheus exporter started on http://{addr}/metrics");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Find My exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install Ctrl-C handler, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
