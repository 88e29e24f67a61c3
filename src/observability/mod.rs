//! Observability for the query path
//!
//! Logging goes through `tracing`; this crate emits events but never installs
//! a subscriber. Counters live in [`QueryMetrics`].
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on query or cache behavior
//! 3. No background tasks

mod metrics;

pub use metrics::{MetricsSnapshot, QueryMetrics};
