//! radar operator CLI.
//!
//! One-shot commands against the same configuration the server loads:
//! run the scrape pipeline, drop the cached batch, or purge expired rows.
//! Logs go to stderr so scraped JSON on stdout stays pipeable.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use radar_client::ScrapePipeline;
use radar_core::config::CacheBackend;
use radar_core::{AppConfig, CacheDb, KeyValueStore, TypedCache, WEBSITES_CACHE_KEY};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "radar")]
#[command(about = "Scrape and manage the tracked-websites cache", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Override the SQLite cache path from configuration
    #[arg(long, global = true, env = "RADAR_DB_PATH")]
    db: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the scrape pipeline once and print the batch as JSON
    Scrape {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        /// Also write the batch to the cache with the configured TTL
        #[arg(long)]
        store: bool,
    },

    /// Drop the cached batch so the next read scrapes again
    Evict,

    /// Delete expired cache entries
    Purge,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load().context("failed to load configuration")?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    match cli.command {
        Command::Scrape { pretty, store } => scrape(&config, pretty, store).await,
        Command::Evict => evict(&config).await,
        Command::Purge => purge(&config).await,
    }
}

async fn scrape(config: &AppConfig, pretty: bool, store: bool) -> Result<()> {
    let pipeline = ScrapePipeline::from_config(config)?;
    let websites = pipeline.run().await.context("scrape failed")?;

    if store {
        let cache = TypedCache::new(open_cache(config).await?, config.cache_ttl());
        cache.set(WEBSITES_CACHE_KEY, &websites, None).await?;
        eprintln!("cached {} websites for {}s", websites.len(), config.cache_ttl_secs);
    }

    let output = if pretty { serde_json::to_string_pretty(&websites)? } else { serde_json::to_string(&websites)? };
    println!("{output}");
    Ok(())
}

async fn evict(config: &AppConfig) -> Result<()> {
    let store = open_cache(config).await?;
    store.delete(WEBSITES_CACHE_KEY).await?;
    eprintln!("evicted {WEBSITES_CACHE_KEY}");
    Ok(())
}

async fn purge(config: &AppConfig) -> Result<()> {
    let store = open_cache(config).await?;
    let removed = store.purge_expired().await?;
    eprintln!("purged {removed} expired entries");
    Ok(())
}

/// Only the SQLite backend outlives a process, so it is the only one the CLI
/// can act on.
async fn open_cache(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>> {
    if config.cache_backend == CacheBackend::Memory {
        bail!("cache backend is `memory`; its entries live only inside the server process");
    }
    let db = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open cache at {}", config.db_path.display()))?;
    Ok(Arc::new(db))
}
