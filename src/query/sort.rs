//! # Sort Normalizer
//!
//! Converts sort shorthand into an ordered list of `{column, direction}`
//! entries.
//!
//! Accepted forms:
//! - `"name"` (ascending)
//! - `{"column": "name", "direction": "desc"}`
//! - `{"name": "desc"}`
//! - `"*"` or `{"*": "random"}` (random order)
//! - an array of any of the above, nested arrays flattened, order preserved

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::ValidationError;

/// Column name used by the random sort directive
pub const RANDOM_COLUMN: &str = "*";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
    Random,
}

impl SortDirection {
    /// Parse a direction, case-insensitive
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            "random" => Some(SortDirection::Random),
            _ => None,
        }
    }

    /// Get the wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
            SortDirection::Random => "random",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One normalized sort entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortEntry {
    pub column: String,
    pub direction: SortDirection,
}

impl SortEntry {
    /// Create a sort entry
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Ascending on `column`
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    /// Descending on `column`
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Desc)
    }

    /// The random-order directive
    pub fn random() -> Self {
        Self::new(RANDOM_COLUMN, SortDirection::Random)
    }

    /// Check the column/direction pairing.
    ///
    /// `random` is only valid on `*`, and `*` only with `random`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.column.is_empty() {
            return Err(ValidationError::InvalidSort("empty column name".to_string()));
        }
        let wildcard = self.column == RANDOM_COLUMN;
        let random = self.direction == SortDirection::Random;
        if wildcard != random {
            return Err(ValidationError::InvalidSort(format!(
                "direction '{}' cannot be used with column '{}'",
                self.direction, self.column
            )));
        }
        Ok(())
    }
}

/// Normalize sort shorthand
pub fn normalize(sort: &Value) -> Result<Vec<SortEntry>, ValidationError> {
    let mut entries = Vec::new();
    collect(sort, &mut entries)?;
    Ok(entries)
}

fn collect(sort: &Value, out: &mut Vec<SortEntry>) -> Result<(), ValidationError> {
    match sort {
        Value::Array(items) => {
            for item in items {
                collect(item, out)?;
            }
            Ok(())
        }
        Value::String(column) => {
            let entry = if column == RANDOM_COLUMN {
                SortEntry::random()
            } else {
                SortEntry::asc(column.as_str())
            };
            push(entry, out)
        }
        Value::Object(map) => push(parse_object(map)?, out),
        other => Err(ValidationError::InvalidSort(format!(
            "unsupported sort shape: {}",
            other
        ))),
    }
}

fn push(entry: SortEntry, out: &mut Vec<SortEntry>) -> Result<(), ValidationError> {
    entry.validate()?;
    out.push(entry);
    Ok(())
}

fn parse_object(map: &Map<String, Value>) -> Result<SortEntry, ValidationError> {
    if is_pair_form(map) {
        let column = map
            .get("column")
            .and_then(Value::as_str)
            .ok_or_else(|| ValidationError::InvalidSort("column must be a string".to_string()))?;
        let direction = match map.get("direction") {
            None => SortDirection::Asc,
            Some(raw) => parse_direction(raw)?,
        };
        return Ok(SortEntry::new(column, direction));
    }

    let mut iter = map.iter();
    match (iter.next(), iter.next()) {
        (Some((column, direction)), None) => {
            Ok(SortEntry::new(column.as_str(), parse_direction(direction)?))
        }
        _ => Err(ValidationError::InvalidSort(format!(
            "expected a single column, got {} keys",
            map.len()
        ))),
    }
}

/// `{column, direction?}` as opposed to the single-key `{column: direction}`.
///
/// `{"column": "asc"}` reads as a sort on a column named `column`.
fn is_pair_form(map: &Map<String, Value>) -> bool {
    if !map.contains_key("column") {
        return false;
    }
    if !map.keys().all(|k| k == "column" || k == "direction") {
        return false;
    }
    if map.len() == 1 {
        let looks_like_direction = map
            .get("column")
            .and_then(Value::as_str)
            .and_then(SortDirection::parse)
            .is_some();
        return !looks_like_direction;
    }
    true
}

fn parse_direction(raw: &Value) -> Result<SortDirection, ValidationError> {
    raw.as_str()
        .and_then(SortDirection::parse)
        .ok_or_else(|| ValidationError::InvalidSort(format!("invalid sort direction: {}", raw)))
}
