//! # Wire Body
//!
//! The compiled request handed to the executor.

use serde::{Deserialize, Serialize};

use super::compiler::NormalizedExpression;
use super::pagination::PageBody;
use super::sort::SortEntry;

/// Compiled query request
///
/// Empty parts are omitted on the wire: no `filter` means match all, no
/// `columns` means all top-level columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<NormalizedExpression>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageBody>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
}

impl QueryBody {
    /// Returns true if the request carries a cursor
    pub fn is_cursor_request(&self) -> bool {
        self.page.as_ref().is_some_and(|p| p.cursor.is_some())
    }
}
