//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (RADAR_*)
//! 2. TOML config file (if RADAR_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Which key-value backend holds the cached website batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Persistent SQLite file at `db_path`.
    Sqlite,
    /// Process-local map, lost on restart.
    Memory,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (RADAR_*)
/// 2. TOML config file (if RADAR_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Page that embeds the `const websites = [...]` literal.
    ///
    /// Set via RADAR_TARGET_URL environment variable.
    #[serde(default = "default_target_url")]
    pub target_url: String,

    /// Lifetime of the cached website batch in seconds.
    ///
    /// Set via RADAR_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Address the HTTP server binds to.
    ///
    /// Set via RADAR_HOST environment variable.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on.
    ///
    /// Set via RADAR_PORT environment variable.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Cache backend selection.
    ///
    /// Set via RADAR_CACHE_BACKEND environment variable (`sqlite` or `memory`).
    #[serde(default = "default_cache_backend")]
    pub cache_backend: CacheBackend,

    /// Path to SQLite cache database.
    ///
    /// Set via RADAR_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for the outbound fetch.
    ///
    /// Set via RADAR_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Outbound request timeout in milliseconds. Transport default when unset.
    ///
    /// Set via RADAR_TIMEOUT_MS environment variable.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Coalesce concurrent cache misses into a single scrape.
    ///
    /// Set via RADAR_SINGLE_FLIGHT environment variable.
    #[serde(default = "default_true")]
    pub single_flight: bool,
}

fn default_target_url() -> String {
    "https://ai-radar.xyz/".into()
}

fn default_cache_ttl_secs() -> u64 {
    600 // 10 minutes
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

fn default_cache_backend() -> CacheBackend {
    CacheBackend::Sqlite
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./radar-cache.sqlite")
}

fn default_user_agent() -> String {
    "radar/0.1".into()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_url: default_target_url(),
            cache_ttl_secs: default_cache_ttl_secs(),
            host: default_host(),
            port: default_port(),
            cache_backend: default_cache_backend(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: None,
            single_flight: true,
        }
    }
}

impl AppConfig {
    /// Cache TTL as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Outbound timeout as Duration, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// `host:port` for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `RADAR_`
    /// 2. TOML file from `RADAR_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered figment used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("RADAR_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("RADAR_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Extract and validate a configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
