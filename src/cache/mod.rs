//! # Result Cache
//!
//! Maps a query's cache key to a `{meta, records}` snapshot with expiry.
//!
//! - A zero TTL skips both the read and the write
//! - Backend failures on the query path are logged and treated as misses
//! - Nothing is invalidated on writes; callers delete affected keys

mod backend;
mod errors;
mod key;
mod memory;

pub use backend::{CacheBackend, CachedPage};
pub use errors::{CacheError, CacheResult};
pub use key::cache_key;
pub use memory::{CacheEntry, CacheStats, InMemoryCache, DEFAULT_MAX_ENTRIES};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::observability::QueryMetrics;
use crate::query::Query;

/// Cache front used by the query path
#[derive(Clone)]
pub struct ResultCache {
    backend: Arc<dyn CacheBackend>,
    metrics: Arc<QueryMetrics>,
}

impl fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCache").finish_non_exhaustive()
    }
}

impl ResultCache {
    /// Wrap a backend
    pub fn new(backend: Arc<dyn CacheBackend>, metrics: Arc<QueryMetrics>) -> Self {
        Self { backend, metrics }
    }

    /// In-memory cache holding at most `max_entries` entries
    pub fn in_memory(max_entries: usize, metrics: Arc<QueryMetrics>) -> Self {
        Self::new(Arc::new(InMemoryCache::new(max_entries)), metrics)
    }

    /// Derive the key of `query` on `table`
    pub fn key(&self, table: &str, query: &Query) -> String {
        cache_key(table, query)
    }

    /// The underlying backend
    pub fn backend(&self) -> &Arc<dyn CacheBackend> {
        &self.backend
    }

    /// Look up a live snapshot. Never fails.
    pub async fn lookup(&self, key: &str, ttl: Duration) -> Option<CachedPage> {
        if ttl.is_zero() {
            return None;
        }
        match self.backend.get(key).await {
            Ok(Some(page)) => {
                self.metrics.increment_cache_hits();
                debug!(cache_key = key, records = page.records.len(), "cache hit");
                Some(page)
            }
            Ok(None) => {
                self.metrics.increment_cache_misses();
                debug!(cache_key = key, "cache miss");
                None
            }
            Err(err) => {
                self.metrics.increment_cache_errors();
                warn!(cache_key = key, error = %err, code = err.code(), "cache read failed");
                None
            }
        }
    }

    /// Store a snapshot. Never fails.
    pub async fn store(&self, key: &str, value: CachedPage, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        if let Err(err) = self.backend.set(key, value, ttl).await {
            self.metrics.increment_cache_errors();
            warn!(cache_key = key, error = %err, code = err.code(), "cache write failed");
        }
    }

    /// Remove one snapshot
    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        self.backend.delete(key).await
    }

    /// Remove every snapshot
    pub async fn clear(&self) -> CacheResult<()> {
        self.backend.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PageMeta;
    use async_trait::async_trait;
    use serde_json::json;

    struct BrokenBackend;

    #[async_trait]
    impl CacheBackend for BrokenBackend {
        async fn get(&self, _key: &str) -> CacheResult<Option<CachedPage>> {
            Err(CacheError::Backend("connection refused".to_string()))
        }

        async fn set(&self, _key: &str, _value: CachedPage, _ttl: Duration) -> CacheResult<()> {
            Err(CacheError::Backend("connection refused".to_string()))
        }

        async fn delete(&self, _key: &str) -> CacheResult<()> {
            Err(CacheError::Backend("connection refused".to_string()))
        }

        async fn clear(&self) -> CacheResult<()> {
            Ok(())
        }
    }

    fn snapshot() -> CachedPage {
        CachedPage::new(PageMeta::new("c1", true), vec![json!({"id": "rec_1"})])
    }

    #[tokio::test]
    async fn test_lookup_store_roundtrip_counts_metrics() {
        let metrics = Arc::new(QueryMetrics::new());
        let cache = ResultCache::in_memory(16, metrics.clone());

        assert!(cache.lookup("k", Duration::from_secs(60)).await.is_none());
        cache.store("k", snapshot(), Duration::from_secs(60)).await;
        assert_eq!(cache.lookup("k", Duration::from_secs(60)).await, Some(snapshot()));

        let snap = metrics.snapshot();
        assert_eq!(snap.cache_hits, 1);
        assert_eq!(snap.cache_misses, 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_skips_read_and_write() {
        let metrics = Arc::new(QueryMetrics::new());
        let cache = ResultCache::in_memory(16, metrics.clone());

        cache.store("k", snapshot(), Duration::from_secs(60)).await;
        assert!(cache.lookup("k", Duration::ZERO).await.is_none());

        cache.store("other", snapshot(), Duration::ZERO).await;
        assert!(cache.lookup("other", Duration::from_secs(60)).await.is_none());
        assert_eq!(metrics.snapshot().cache_hits, 0);
    }

    #[tokio::test]
    async fn test_backend_failures_are_not_fatal() {
        let metrics = Arc::new(QueryMetrics::new());
        let cache = ResultCache::new(Arc::new(BrokenBackend), metrics.clone());

        assert!(cache.lookup("k", Duration::from_secs(60)).await.is_none());
        cache.store("k", snapshot(), Duration::from_secs(60)).await;
        assert_eq!(metrics.snapshot().cache_errors, 2);

        // Explicit maintenance surfaces the error.
        assert!(cache.delete("k").await.is_err());
        assert!(cache.clear().await.is_ok());
    }
}
