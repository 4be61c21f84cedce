//! Typed JSON access on top of a [`KeyValueStore`].
//!
//! The cache is best-effort on the read path: a backend failure or a value
//! that no longer decodes is logged and reported as a miss, which makes the
//! caller fall back to the source of truth.

use super::store::KeyValueStore;
use crate::Error;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// JSON-encoding cache wrapper with a default TTL.
#[derive(Clone)]
pub struct TypedCache {
    store: Arc<dyn KeyValueStore>,
    default_ttl: Duration,
}

impl TypedCache {
    pub fn new(store: Arc<dyn KeyValueStore>, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    /// Read and decode a value. Never fails: errors degrade to `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "cached value failed to decode, treating as miss");
                None
            }
        }
    }

    /// Encode and store a value with `ttl`, or the default TTL when `None`.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<(), Error> {
        let raw = serde_json::to_string(value).map_err(|e| Error::CacheCodec(format!("failed to encode {key}: {e}")))?;
        self.store.set(key, raw, ttl.unwrap_or(self.default_ttl)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use async_trait::async_trait;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        name: String,
        count: u32,
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, Error> {
            Err(Error::CacheCodec("backend down".into()))
        }

        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), Error> {
            Err(Error::CacheCodec("backend down".into()))
        }

        async fn delete(&self, _key: &str) -> Result<(), Error> {
            Ok(())
        }

        async fn purge_expired(&self) -> Result<u64, Error> {
            Ok(0)
        }
    }

    fn cache_over(store: Arc<dyn KeyValueStore>) -> TypedCache {
        TypedCache::new(store, Duration::from_secs(600))
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let cache = cache_over(Arc::new(MemoryStore::new()));
        let entry = Entry { name: "a".into(), count: 2 };

        cache.set("entry", &entry, None).await.unwrap();
        assert_eq!(cache.get::<Entry>("entry").await, Some(entry));
    }

    #[tokio::test]
    async fn test_website_rating_reads_back_exactly() {
        let cache = cache_over(Arc::new(MemoryStore::new()));
        let site = crate::Website {
            hostname: "a.com".into(),
            name: "A".into(),
            logo: "a.png".into(),
            description: "d".into(),
            rating: Some(2.7297566399756366),
            review: None,
            reviewed_on: None,
        };

        cache.set("sites", &[site.clone()], None).await.unwrap();
        assert_eq!(cache.get::<Vec<crate::Website>>("sites").await, Some(vec![site]));
    }

    #[tokio::test]
    async fn test_corrupt_value_is_miss() {
        let store = Arc::new(MemoryStore::new());
        store.set("entry", "{not json".to_string(), Duration::from_secs(60)).await.unwrap();

        let cache = cache_over(store);
        assert_eq!(cache.get::<Entry>("entry").await, None);
    }

    #[tokio::test]
    async fn test_schema_drift_is_miss() {
        let store = Arc::new(MemoryStore::new());
        store.set("entry", r#"{"name":"a"}"#.to_string(), Duration::from_secs(60)).await.unwrap();

        let cache = cache_over(store);
        assert_eq!(cache.get::<Entry>("entry").await, None);
    }

    #[tokio::test]
    async fn test_backend_read_error_is_miss() {
        let cache = cache_over(Arc::new(FailingStore));
        assert_eq!(cache.get::<Entry>("entry").await, None);
    }

    #[tokio::test]
    async fn test_backend_write_error_propagates() {
        let cache = cache_over(Arc::new(FailingStore));
        let result = cache.set("entry", &Entry { name: "a".into(), count: 1 }, None).await;
        assert!(matches!(result, Err(e) if e.is_cache()));
    }
}
