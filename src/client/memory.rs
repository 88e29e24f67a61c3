//! # In-Memory Executor
//!
//! Serves pages from fixed record sets, for offline use and tests.
//!
//! Only the page window is applied. Filters, sorts and projections are
//! recorded with the request but not evaluated. Cursors are `"{start}:{end}"`
//! windows over the table's records.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::errors::TransportError;
use super::executor::{QueryExecutor, QueryResponse, Record};
use crate::query::{Cursor, PageMeta, QueryBody, PAGINATION_DEFAULT_SIZE};

/// Executor over in-memory tables
#[derive(Debug, Default)]
pub struct InMemoryExecutor {
    tables: HashMap<String, Vec<Record>>,
    requests: Mutex<Vec<(String, QueryBody)>>,
    failures: Mutex<VecDeque<TransportError>>,
}

impl InMemoryExecutor {
    /// Create an executor with no tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table
    pub fn with_table(mut self, name: impl Into<String>, records: Vec<Record>) -> Self {
        self.tables.insert(name.into(), records);
        self
    }

    /// Fail the next call with `error`
    pub async fn fail_next(&self, error: TransportError) {
        self.failures.lock().await.push_back(error);
    }

    /// Every request received so far, in order
    pub async fn requests(&self) -> Vec<(String, QueryBody)> {
        self.requests.lock().await.clone()
    }

    /// Number of requests received so far
    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    fn window(&self, body: &QueryBody, len: usize) -> Result<(usize, usize), TransportError> {
        let page = body.page.as_ref();
        let size = page
            .and_then(|p| p.size)
            .unwrap_or(PAGINATION_DEFAULT_SIZE) as usize;
        let offset = page.and_then(|p| p.offset).unwrap_or(0) as usize;

        let start = match page.and_then(|p| p.cursor.as_ref()) {
            None | Some(Cursor::Start(_)) => offset,
            Some(Cursor::After(token)) => parse_cursor(token)?.1.saturating_add(offset),
            Some(Cursor::Before(token)) => parse_cursor(token)?.0.saturating_sub(size),
            Some(Cursor::End(_)) => len.saturating_sub(size),
        };
        let start = start.min(len);
        Ok((start, (start + size).min(len)))
    }
}

fn parse_cursor(token: &str) -> Result<(usize, usize), TransportError> {
    let invalid = || TransportError::Http {
        status: 400,
        message: format!("invalid cursor: {}", token),
    };
    let (start, end) = token.split_once(':').ok_or_else(invalid)?;
    Ok((
        start.parse().map_err(|_| invalid())?,
        end.parse().map_err(|_| invalid())?,
    ))
}

#[async_trait]
impl QueryExecutor for InMemoryExecutor {
    async fn execute(&self, table: &str, body: &QueryBody) -> Result<QueryResponse, TransportError> {
        self.requests
            .lock()
            .await
            .push((table.to_string(), body.clone()));

        if let Some(error) = self.failures.lock().await.pop_front() {
            return Err(error);
        }

        let records = self.tables.get(table).ok_or_else(|| TransportError::Http {
            status: 404,
            message: format!("table not found: {}", table),
        })?;

        let (start, end) = self.window(body, records.len())?;
        Ok(QueryResponse::new(
            PageMeta::new(format!("{}:{}", start, end), end < records.len()),
            records[start..end].to_vec(),
        ))
    }
}
