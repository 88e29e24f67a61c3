//! # Cache Errors

use thiserror::Error;

/// Result type for cache backend operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache backend errors
///
/// On the query path these are non-fatal: the query falls through to a
/// live fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Backend could not be reached or rejected the operation
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// Stored value could not be encoded or decoded
    #[error("Cache serialization error: {0}")]
    Serialization(String),
}

impl CacheError {
    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CacheError::Backend(_) => "RQL_CACHE_BACKEND",
            CacheError::Serialization(_) => "RQL_CACHE_SERIALIZATION",
        }
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}
