//! radar-api server entry point.
//!
//! Boots the read-only websites API over HTTP. Logging goes to stderr as JSON.

use anyhow::{Context, Result};
use radar_client::ScrapePipeline;
use radar_core::config::CacheBackend;
use radar_core::{AppConfig, CacheDb, KeyValueStore, MemoryStore, TypedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod error;
mod routes;
mod service;

use routes::AppState;
use service::WebsiteService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    tracing::info!(
        target_url = %config.target_url,
        ttl_secs = config.cache_ttl_secs,
        backend = ?config.cache_backend,
        single_flight = config.single_flight,
        "starting radar-api"
    );
    if !config.single_flight {
        tracing::warn!("single_flight disabled; concurrent cache misses will each scrape the source page");
    }

    let store = open_store(&config).await?;
    let cache = TypedCache::new(store.clone(), config.cache_ttl());
    let pipeline = ScrapePipeline::from_config(&config).context("failed to build scrape pipeline")?;
    let service = WebsiteService::new(cache, Arc::new(pipeline), config.single_flight);

    let purge = tokio::spawn(purge_expired(store, config.cache_ttl()));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await.with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, routes::router(AppState::new(service)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    purge.abort();
    tracing::info!("server stopped");
    Ok(())
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.cache_backend {
        CacheBackend::Sqlite => Arc::new(
            CacheDb::open(&config.db_path)
                .await
                .with_context(|| format!("failed to open cache at {}", config.db_path.display()))?,
        ),
        CacheBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}

/// Delete expired cache entries once per TTL period.
async fn purge_expired(store: Arc<dyn KeyValueStore>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await;
    loop {
        interval.tick().await;
        match store.purge_expired().await {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "purged expired cache entries"),
            Err(e) => tracing::warn!(error = %e, "cache purge failed"),
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    tracing::info!("shutdown signal received");
}
