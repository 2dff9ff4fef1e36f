//! tickerdeck-cache
//!
//! A single process-wide store of successful fetch results, keyed by the
//! composite strings produced by `DataKind::cache_key` (e.g. `price|AAPL|1M`).
//!
//! - Entries carry their own TTL; a hit inside it never recomputes.
//! - Failures are never stored.
//! - Concurrent misses for one key share a single computation.
#![warn(missing_docs)]

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;
use tickerdeck_types::{
    CacheConfig, FetchOutcome, Payload, PayloadKind, ProviderId, Sourced, TickerdeckError,
};

/// One stored success.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Cached payload.
    pub payload: Payload,
    /// Provider that produced it.
    pub provider: ProviderId,
    /// When it was stored.
    pub created_at: Instant,
    /// Freshness window it was stored with.
    pub ttl: Duration,
}

impl CacheEntry {
    /// Whether the entry is older than its TTL.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

struct EntryTtl;

impl Expiry<String, Arc<CacheEntry>> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Arc<CacheEntry>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Arc<CacheEntry>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// TTL cache of provenance-tagged fetch results.
///
/// Cloning is cheap and clones share storage.
#[derive(Clone)]
pub struct ResultCache {
    inner: Cache<String, Arc<CacheEntry>>,
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl ResultCache {
    /// Cache holding at most `max_entries` results.
    #[must_use]
    pub fn new(max_entries: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_entries)
                .expire_after(EntryTtl)
                .build(),
        }
    }

    /// Cache sized from configuration. Per-kind TTLs are supplied per call.
    #[must_use]
    pub fn from_config(cfg: &CacheConfig) -> Self {
        Self::new(cfg.max_entries)
    }

    /// Return the fresh entry under `key`, or run `compute` and store its success.
    ///
    /// A `ttl` of `None` or zero bypasses the cache entirely. Callers racing on
    /// the same missing key await one shared `compute`; if it fails, each of
    /// them receives the error and nothing is stored.
    ///
    /// # Errors
    /// Returns `compute`'s error unchanged.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> FetchOutcome<T>
    where
        T: PayloadKind,
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchOutcome<T>>,
    {
        let Some(ttl) = ttl.filter(|t| !t.is_zero()) else {
            return compute().await;
        };

        if let Some(hit) = self.lookup::<T>(key).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "tickerdeck::cache", key, provider = hit.provider.as_str(), "cache hit");
            return Ok(hit);
        }

        let entry = self
            .inner
            .try_get_with(key.to_owned(), async move {
                let fresh = compute().await?;
                Ok::<_, TickerdeckError>(Arc::new(CacheEntry {
                    payload: fresh.value.into_payload(),
                    provider: fresh.provider,
                    created_at: Instant::now(),
                    ttl,
                }))
            })
            .await
            .map_err(Arc::unwrap_or_clone)?;

        T::from_payload(&entry.payload)
            .map(|value| Sourced::new(value, entry.provider))
            .ok_or_else(|| {
                TickerdeckError::Data(format!(
                    "cached {} payload under {key} has the wrong shape",
                    entry.payload.label()
                ))
            })
    }

    async fn lookup<T: PayloadKind>(&self, key: &str) -> Option<Sourced<T>> {
        let entry = self.inner.get(key).await?;
        match T::from_payload(&entry.payload) {
            Some(value) => Some(Sourced::new(value, entry.provider)),
            None => {
                self.inner.invalidate(key).await;
                None
            }
        }
    }

    /// The stored entry under `key`, if still fresh.
    pub async fn entry(&self, key: &str) -> Option<Arc<CacheEntry>> {
        self.inner.get(key).await
    }

    /// Drop the entry under `key`.
    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }

    /// Number of live entries after pending maintenance has run.
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}
