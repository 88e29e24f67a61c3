//! # Transport Errors
//!
//! Errors produced by a [`super::QueryExecutor`]. The query path surfaces
//! them unchanged and never retries.

use thiserror::Error;

/// Remote call failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Server could not be reached
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Server answered with a body that is not a page of records
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TransportError::Http { .. } => "RQL_TRANSPORT_HTTP",
            TransportError::Connection(_) => "RQL_TRANSPORT_CONNECTION",
            TransportError::InvalidResponse(_) => "RQL_TRANSPORT_INVALID_RESPONSE",
        }
    }

    /// HTTP status, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_code() {
        let err = TransportError::Http {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.code(), "RQL_TRANSPORT_HTTP");
        assert_eq!(err.to_string(), "HTTP 429: rate limited");

        assert_eq!(TransportError::Connection("refused".into()).status(), None);
    }
}
