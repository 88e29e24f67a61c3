//! recordql - declarative queries for remote record tables
//!
//! Queries are immutable values built by chaining composition calls. They
//! compile into a normalized `AND`/`OR`/`NOT` wire expression and run through
//! a pluggable executor with cursor or offset pagination and a TTL cache.
//!
//! ```ignore
//! use recordql::client::{Client, InMemoryExecutor};
//! use recordql::query::operators::{gt, contains};
//! use recordql::query::SortDirection;
//!
//! let client = Client::new(Arc::new(InMemoryExecutor::new()));
//! let users = client.table("users");
//! let query = users
//!     .query()
//!     .filter("age", gt(18))
//!     .filter("name", contains("ann"))
//!     .sort("age", SortDirection::Desc);
//! let page = users.get_paginated(&query).await?;
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod observability;
pub mod query;

pub use client::{Client, Page, QueryExecutor, Record, Table, TransportError};
pub use config::{CacheConfig, ClientConfig};
pub use query::{Query, QueryError, QueryResult, ValidationError};
