//! # Query Errors
//!
//! Error types for query construction and execution.

use thiserror::Error;

use crate::cache::CacheError;
use crate::client::TransportError;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Request shape rejected before any network call.
///
/// Validation errors are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Page size above the server limit
    #[error("page size exceeds max limit of {max}")]
    PageSizeExceeded { size: u32, max: u32 },

    /// Page offset above the server limit
    #[error("page offset must not exceed {max}")]
    PageOffsetExceeded { offset: u32, max: u32 },

    /// A cursor request also carries filter or sort
    #[error("cursor pagination cannot be combined with filter or sort")]
    CursorWithFilterOrSort,

    /// Page navigation from a page the server gave no cursor for
    #[error("page has no cursor to navigate from")]
    MissingCursor,

    /// Sort shape matches none of the accepted forms
    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    /// Batch size outside the accepted range
    #[error("Invalid batch size: {0}")]
    InvalidBatchSize(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ValidationError {
    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::PageSizeExceeded { .. } => "RQL_PAGE_SIZE_EXCEEDED",
            ValidationError::PageOffsetExceeded { .. } => "RQL_PAGE_OFFSET_EXCEEDED",
            ValidationError::CursorWithFilterOrSort => "RQL_CURSOR_WITH_FILTER",
            ValidationError::MissingCursor => "RQL_MISSING_CURSOR",
            ValidationError::InvalidSort(_) => "RQL_INVALID_SORT",
            ValidationError::InvalidBatchSize(_) => "RQL_INVALID_BATCH_SIZE",
            ValidationError::InvalidConfig(_) => "RQL_INVALID_CONFIG",
        }
    }
}

/// Query errors
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// Request rejected locally
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Remote call failed; surfaced unchanged from the executor
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Explicit cache maintenance failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A query that requires a record returned none
    #[error("No results found")]
    NotFound,
}

impl QueryError {
    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Validation(err) => err.code(),
            QueryError::Transport(err) => err.code(),
            QueryError::Cache(err) => err.code(),
            QueryError::NotFound => "RQL_NOT_FOUND",
        }
    }

    /// Returns true if the request never left the client
    pub fn is_validation(&self) -> bool {
        matches!(self, QueryError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_messages() {
        let err = ValidationError::PageSizeExceeded { size: 201, max: 200 };
        assert_eq!(err.to_string(), "page size exceeds max limit of 200");

        let err = ValidationError::PageOffsetExceeded { offset: 801, max: 800 };
        assert_eq!(err.to_string(), "page offset must not exceed 800");
    }

    #[test]
    fn test_validation_error_propagation() {
        let err = QueryError::from(ValidationError::CursorWithFilterOrSort);
        assert!(err.is_validation());
        assert_eq!(err.code(), "RQL_CURSOR_WITH_FILTER");
        assert_eq!(
            err.to_string(),
            "cursor pagination cannot be combined with filter or sort"
        );
    }

    #[test]
    fn test_transport_error_is_transparent() {
        let transport = TransportError::Http {
            status: 503,
            message: "unavailable".to_string(),
        };
        let err = QueryError::from(transport.clone());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), transport.to_string());
    }
}
