//! Query metrics
//!
//! - Counters only, monotonic
//! - Reset only when the registry is created
//! - Passive: never influence query or cache behavior

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters of the query path
///
/// All counters use Relaxed atomics; eventual consistency is fine here.
#[derive(Debug, Default)]
pub struct QueryMetrics {
    /// Queries answered (from cache or remote)
    queries_executed: AtomicU64,
    /// Queries rejected by local validation
    queries_rejected: AtomicU64,
    /// Queries that failed in the executor
    queries_failed: AtomicU64,
    /// Pages fetched from the executor
    pages_fetched: AtomicU64,
    /// Records received from the executor
    records_fetched: AtomicU64,
    /// Cache lookups that returned a snapshot
    cache_hits: AtomicU64,
    /// Cache lookups that returned nothing
    cache_misses: AtomicU64,
    /// Cache backend failures swallowed on the query path
    cache_errors: AtomicU64,
}

impl QueryMetrics {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_failed(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one fetched page of `records` records
    pub fn record_page(&self, records: usize) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
        self.records_fetched
            .fetch_add(records as u64, Ordering::Relaxed);
    }

    pub fn increment_cache_hits(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_misses(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_errors(&self) {
        self.cache_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            records_fetched: self.records_fetched.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            cache_errors: self.cache_errors.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_rejected: u64,
    pub queries_failed: u64,
    pub pages_fetched: u64,
    pub records_fetched: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_errors: u64,
}

impl MetricsSnapshot {
    /// Share of cache lookups that hit, if any lookup happened
    pub fn cache_hit_ratio(&self) -> Option<f64> {
        let lookups = self.cache_hits + self.cache_misses;
        (lookups > 0).then(|| self.cache_hits as f64 / lookups as f64)
    }
}
