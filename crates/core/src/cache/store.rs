//! Key-value store abstraction.
//!
//! The query service only needs `get`/`set`/`delete` with a TTL, so the
//! backend is hidden behind [`KeyValueStore`]. [`CacheDb`] persists entries
//! in SQLite; [`MemoryStore`] keeps them in a process-local map.

use super::connection::CacheDb;
use crate::Error;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Generic key-value backend with per-entry expiry.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch a live value. Expired entries read as `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store a value, replacing any previous one and resetting its TTL.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), Error>;

    /// Remove a value. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<(), Error>;

    /// Drop expired entries, returning how many were removed.
    async fn purge_expired(&self) -> Result<u64, Error>;
}

#[async_trait]
impl KeyValueStore for CacheDb {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.get_entry(key).await
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), Error> {
        let ttl_seconds = i64::try_from(ttl.as_secs())
            .map_err(|_| Error::CacheCodec(format!("ttl of {}s for {key} is out of range", ttl.as_secs())))?
            .max(1);
        self.put_entry(key, &value, ttl_seconds).await
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.delete_entry(key).await.map(|_| ())
    }

    async fn purge_expired(&self) -> Result<u64, Error> {
        self.purge_expired_entries().await
    }
}

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

impl MemoryEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-process store backed by a `HashMap` behind a tokio `RwLock`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, MemoryEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), Error> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| Error::CacheCodec(format!("ttl of {}s for {key} is out of range", ttl.as_secs())))?;
        self.entries
            .write()
            .await
            .insert(key.to_string(), MemoryEntry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, Error> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        Ok((before - entries.len()) as u64)
    }
}
