//! Client Configuration
//!
//! Page size, bulk batch size and cache settings for a [`crate::client::Client`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_MAX_ENTRIES;
use crate::query::pagination::{validate_batch_size, validate_size};
use crate::query::{ValidationError, PAGINATION_DEFAULT_SIZE, PAGINATION_MAX_SIZE};

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Records collected by `get_many` when the query sets no page size
    /// (default: 20)
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Records per request in bulk helpers (default: 200)
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Result cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

fn default_page_size() -> u32 {
    PAGINATION_DEFAULT_SIZE
}

fn default_batch_size() -> u32 {
    PAGINATION_MAX_SIZE
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            batch_size: default_batch_size(),
            cache: CacheConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Parse from JSON; missing fields take defaults
    pub fn from_json_str(raw: &str) -> Result<Self, ValidationError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| ValidationError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values against the pagination bounds
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_size(self.default_page_size)
            .map_err(|e| ValidationError::InvalidConfig(format!("default_page_size: {}", e)))?;
        validate_batch_size(self.batch_size)
            .map_err(|e| ValidationError::InvalidConfig(format!("batch_size: {}", e)))?;
        Ok(())
    }

    /// Config with caching turned off
    pub fn without_cache() -> Self {
        Self {
            cache: CacheConfig {
                enabled: false,
                ..CacheConfig::default()
            },
            ..Self::default()
        }
    }
}

/// Result cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether query results are cached at all (default: true)
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// TTL for queries that set none, in milliseconds (default: 60000)
    #[serde(default = "default_ttl_ms")]
    pub default_ttl_ms: u64,

    /// Capacity of the in-memory backend (default: 10000)
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_ttl_ms() -> u64 {
    60_000
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            default_ttl_ms: default_ttl_ms(),
            max_entries: default_max_entries(),
        }
    }
}

impl CacheConfig {
    /// TTL applied to queries without their own; zero when disabled
    pub fn default_ttl(&self) -> Duration {
        if self.enabled {
            Duration::from_millis(self.default_ttl_ms)
        } else {
            Duration::ZERO
        }
    }
}
