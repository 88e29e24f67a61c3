//! # Execution Façade
//!
//! The collaborator that performs the remote call. It owns auth, retries
//! and HTTP status translation; this crate only hands it a compiled body.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::TransportError;
use crate::query::{PageMeta, QueryBody};

/// A raw record as returned by the server
pub type Record = Value;

/// One page of results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub meta: PageMeta,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl QueryResponse {
    /// Create a response
    pub fn new(meta: PageMeta, records: Vec<Record>) -> Self {
        Self { meta, records }
    }

    /// Decode a raw JSON response
    pub fn from_json(value: Value) -> Result<Self, TransportError> {
        serde_json::from_value(value).map_err(|e| TransportError::InvalidResponse(e.to_string()))
    }
}

/// Executes compiled queries against a remote table
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run `body` against `table`
    async fn execute(&self, table: &str, body: &QueryBody) -> Result<QueryResponse, TransportError>;
}
