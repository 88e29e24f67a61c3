//! # Query Construction
//!
//! Declarative filters, sorts, projections and pagination, composed into
//! immutable [`Query`] nodes and compiled into the wire [`QueryBody`].

pub mod body;
pub mod cleanup;
pub mod compiler;
pub mod errors;
pub mod filter;
pub mod node;
pub mod operators;
pub mod pagination;
pub mod sort;

pub use body::QueryBody;
pub use cleanup::{ColumnKind, ColumnSchema, TableSchema};
pub use compiler::{compile, Branch, Leaf, NormalizedExpression, WireOperator};
pub use errors::{QueryError, QueryResult, ValidationError};
pub use filter::{FilterKey, FilterValue, Group, Operator};
pub use node::{Query, QueryFilter, QueryIdentity};
pub use pagination::{
    Cursor, Navigation, PageBody, PageMeta, Pagination, PAGINATION_DEFAULT_SIZE,
    PAGINATION_MAX_OFFSET, PAGINATION_MAX_SIZE,
};
pub use sort::{SortDirection, SortEntry};
