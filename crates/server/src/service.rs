//! Website query service.
//!
//! Cache-aside over the scrape pipeline: read the cached batch, and on a miss
//! scrape, store, and return. The batch lives only in the cache; nothing is
//! kept here between calls.
//!
//! With single-flight enabled, a miss joins the scrape already in flight or
//! starts one, and every caller that joined gets the same outcome, error
//! included. The slot is cleared once the flight settles, so a failure is
//! never served to a request that arrives afterwards. Without single-flight
//! every concurrent miss scrapes and the last write wins.

use radar_client::WebsiteSource;
use radar_core::{Error, TypedCache, WEBSITES_CACHE_KEY, Website};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// One scrape, shared by every caller that missed while it ran.
type Flight = Arc<OnceCell<Result<Vec<Website>, Error>>>;

pub struct WebsiteService {
    cache: TypedCache,
    source: Arc<dyn WebsiteSource>,
    in_flight: Option<Mutex<Option<Flight>>>,
}

impl WebsiteService {
    pub fn new(cache: TypedCache, source: Arc<dyn WebsiteSource>, single_flight: bool) -> Self {
        Self { cache, source, in_flight: single_flight.then(|| Mutex::new(None)) }
    }

    /// All tracked websites.
    pub async fn list(&self) -> Result<Vec<Website>, Error> {
        self.resolve().await
    }

    /// First website whose hostname matches exactly (case-sensitive).
    pub async fn get_by_hostname(&self, hostname: &str) -> Result<Website, Error> {
        self.resolve()
            .await?
            .into_iter()
            .find(|w| w.hostname == hostname)
            .ok_or_else(|| Error::NotFound(hostname.to_string()))
    }

    async fn resolve(&self) -> Result<Vec<Website>, Error> {
        if let Some(websites) = self.cache.get::<Vec<Website>>(WEBSITES_CACHE_KEY).await {
            tracing::debug!(count = websites.len(), "serving websites from cache");
            return Ok(websites);
        }

        let Some(slot) = &self.in_flight else {
            return self.scrape_and_store().await;
        };

        let flight = {
            let mut slot = slot.lock().await;
            if let Some(flight) = slot.clone() {
                tracing::debug!("joining in-flight scrape");
                flight
            } else {
                // a flight may have settled between the first read and the lock
                if let Some(websites) = self.cache.get::<Vec<Website>>(WEBSITES_CACHE_KEY).await {
                    return Ok(websites);
                }
                let flight = Flight::default();
                *slot = Some(flight.clone());
                flight
            }
        };

        // If the caller driving the scrape is dropped, the next waiter runs it.
        let outcome = flight.get_or_init(|| self.scrape_and_store()).await.clone();

        let mut slot = slot.lock().await;
        if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, &flight)) {
            *slot = None;
        }

        outcome
    }

    async fn scrape_and_store(&self) -> Result<Vec<Website>, Error> {
        tracing::info!("cache miss, fetching fresh data");
        let websites = self.source.fetch_websites().await?;

        if let Err(e) = self.cache.set(WEBSITES_CACHE_KEY, &websites, None).await {
            tracing::warn!(error = %e, "failed to cache websites; serving fresh data anyway");
        }

        Ok(websites)
    }
}
