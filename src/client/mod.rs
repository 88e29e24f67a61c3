//! # Client
//!
//! Binds the query layer to an execution façade, a result cache and
//! configuration. [`Client::table`] hands out [`Table`] handles that run
//! queries and return [`Page`]s.

mod errors;
mod executor;
mod memory;
mod page;
mod table;

pub use errors::TransportError;
pub use executor::{QueryExecutor, QueryResponse, Record};
pub use memory::InMemoryExecutor;
pub use page::Page;
pub use table::Table;

use std::fmt;
use std::sync::Arc;

use crate::cache::{CacheBackend, ResultCache};
use crate::config::ClientConfig;
use crate::observability::{MetricsSnapshot, QueryMetrics};
use crate::query::ValidationError;

/// Shared handle to an executor, cache and configuration. Cheap to clone.
#[derive(Clone)]
pub struct Client {
    executor: Arc<dyn QueryExecutor>,
    cache: ResultCache,
    config: Arc<ClientConfig>,
    metrics: Arc<QueryMetrics>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client with default configuration and an in-memory cache
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        let config = ClientConfig::default();
        let metrics = Arc::new(QueryMetrics::new());
        let cache = ResultCache::in_memory(config.cache.max_entries, metrics.clone());
        Self {
            executor,
            cache,
            config: Arc::new(config),
            metrics,
        }
    }

    /// Client with `config` and an in-memory cache sized from it
    pub fn with_config(
        executor: Arc<dyn QueryExecutor>,
        config: ClientConfig,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        let metrics = Arc::new(QueryMetrics::new());
        let cache = ResultCache::in_memory(config.cache.max_entries, metrics.clone());
        Ok(Self {
            executor,
            cache,
            config: Arc::new(config),
            metrics,
        })
    }

    /// Client with `config` and a custom cache backend
    pub fn with_cache_backend(
        executor: Arc<dyn QueryExecutor>,
        config: ClientConfig,
        backend: Arc<dyn CacheBackend>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        let metrics = Arc::new(QueryMetrics::new());
        Ok(Self {
            executor,
            cache: ResultCache::new(backend, metrics.clone()),
            config: Arc::new(config),
            metrics,
        })
    }

    /// Handle to the table `name`
    pub fn table(&self, name: impl Into<String>) -> Table {
        Table::new(self.clone(), name.into())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Snapshot of the query counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub(crate) fn executor(&self) -> &Arc<dyn QueryExecutor> {
        &self.executor
    }

    pub(crate) fn metrics_registry(&self) -> &QueryMetrics {
        &self.metrics
    }
}
