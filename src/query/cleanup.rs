//! # Type-Aware Constraint Cleanup
//!
//! Rewrites a column constraint using the table schema before it is stored
//! on a query:
//! - a string (or list of strings) on a `multiple` column becomes
//!   `{$includes: value}`
//! - a link record (an object with a string `id`) on a `link` column becomes
//!   its bare id
//!
//! Runs at composition time. The compiler never sees the schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::filter::{FilterKey, FilterValue, Operator};

/// Column kinds relevant to filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    String,
    Text,
    Email,
    Int,
    Float,
    Bool,
    Datetime,
    /// Multi-valued string column
    Multiple,
    /// Reference to a record of another table
    Link,
    Object,
    Json,
    #[serde(other)]
    Other,
}

/// A single column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Column definitions of one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    /// Create a schema
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSchema>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Look up a column's kind
    pub fn column_kind(&self, column: &str) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.kind)
    }
}

/// Rewrite a constraint on `column` according to its kind
pub fn clean_constraint(
    schema: Option<&TableSchema>,
    column: &str,
    value: FilterValue,
) -> FilterValue {
    let kind = schema.and_then(|s| s.column_kind(column));

    if kind == Some(ColumnKind::Multiple) && is_string_or_string_list(&value) {
        return FilterValue::entry(FilterKey::Operator(Operator::Includes), value);
    }

    if kind == Some(ColumnKind::Link) {
        if let Some(id) = link_id(&value) {
            return FilterValue::Literal(Value::String(id));
        }
    }

    value
}

fn is_string_or_string_list(value: &FilterValue) -> bool {
    match value {
        FilterValue::Literal(Value::String(_)) => true,
        FilterValue::List(items) => {
            !items.is_empty()
                && items
                    .iter()
                    .all(|item| matches!(item, FilterValue::Literal(Value::String(_))))
        }
        _ => false,
    }
}

/// The `id` of a link record value, if `value` is one
fn link_id(value: &FilterValue) -> Option<String> {
    if value.is_operator_object() {
        return None;
    }
    let FilterValue::Object(entries) = value else {
        return None;
    };
    entries.iter().find_map(|(key, nested)| match (key, nested) {
        (FilterKey::Field(name), FilterValue::Literal(Value::String(id))) if name == "id" => {
            Some(id.clone())
        }
        _ => None,
    })
}
