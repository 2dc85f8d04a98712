mod config;
mod http;
mod provider;

use std::sync::Arc;

use anyhow::{Context, Result};
use common::{Fleet, MemoryStore};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};
use updater::Updater;

use crate::provider::Provider;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    Registry::default().with(filter).with(fmt::layer()).init();

    let updater_config = updater::Config::from_env().context("loading updater config")?;

    let store = match config::get_fleet_path() {
        Some(path) => {
            let fleet = Fleet::from_path(&path)?;
            info!(
                path = %path,
                vehicles = fleet.vehicles.len(),
                routes = fleet.routes.len(),
                "loaded fleet"
            );
            MemoryStore::from_fleet(fleet)
        }
        None => MemoryStore::new(),
    };

    let updater = Arc::new(Updater::new(updater_config, Arc::new(Provider::new(store))));
    let router = http::router(updater.cache());

    let worker = Arc::clone(&updater);
    tokio::spawn(async move { worker.run().await });

    let addr = config::get_http_addr();
    let listener =
        TcpListener::bind(&addr).await.with_context(|| format!("binding to {addr}"))?;
    info!(addr = %addr, "serving /datafeed");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown())
        .await
        .context("serving http")
}

async fn shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
