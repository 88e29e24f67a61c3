//! # Cache Backend Trait

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::CacheResult;
use crate::client::Record;
use crate::query::PageMeta;

/// Snapshot of one fetched page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPage {
    pub meta: PageMeta,
    pub records: Vec<Record>,
}

impl CachedPage {
    pub fn new(meta: PageMeta, records: Vec<Record>) -> Self {
        Self { meta, records }
    }
}

/// Pluggable storage for cached query results
///
/// Implementations own expiry: `get` must not return an entry whose TTL has
/// elapsed.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetch a live entry
    async fn get(&self, key: &str) -> CacheResult<Option<CachedPage>>;

    /// Store an entry for `ttl`
    async fn set(&self, key: &str, value: CachedPage, ttl: Duration) -> CacheResult<()>;

    /// Remove one entry
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Remove every entry
    async fn clear(&self) -> CacheResult<()>;
}
