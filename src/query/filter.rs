//! # Filter Values
//!
//! The caller-facing declarative filter grammar as a tagged sum type.
//!
//! A filter value is a literal (shorthand equality), an ordered object whose
//! keys are groups, operators or field names, or a list of filter values.
//! JSON input is classified once at the boundary by [`FilterValue::from`].

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Boolean group sigils
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    /// `$all`
    All,
    /// `$any`
    Any,
    /// `$not`
    Not,
    /// `$none`
    None,
}

impl Group {
    /// Get the sigil string
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::All => "$all",
            Group::Any => "$any",
            Group::Not => "$not",
            Group::None => "$none",
        }
    }
}

/// Filter operators accepted inside an operator object
///
/// The set is closed; anything else starting with `$` is kept as
/// `Unknown` and compiles to equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Is,
    Eq,
    Gt,
    Lt,
    Ge,
    Gte,
    Le,
    Lte,
    Ne,
    Contains,
    Includes,
    Exists,
    NotExists,
    Unknown(String),
}

impl Operator {
    /// Get the sigil string
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Is => "$is",
            Operator::Eq => "$eq",
            Operator::Gt => "$gt",
            Operator::Lt => "$lt",
            Operator::Ge => "$ge",
            Operator::Gte => "$gte",
            Operator::Le => "$le",
            Operator::Lte => "$lte",
            Operator::Ne => "$ne",
            Operator::Contains => "$contains",
            Operator::Includes => "$includes",
            Operator::Exists => "$exists",
            Operator::NotExists => "$notExists",
            Operator::Unknown(raw) => raw,
        }
    }
}

/// Classified key of a filter object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Group(Group),
    Operator(Operator),
    Field(String),
}

impl FilterKey {
    /// Classify a raw object key.
    ///
    /// Keys starting with `$` are groups or operators; everything else is a
    /// field name.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "$all" => FilterKey::Group(Group::All),
            "$any" => FilterKey::Group(Group::Any),
            "$not" => FilterKey::Group(Group::Not),
            "$none" => FilterKey::Group(Group::None),
            "$is" => FilterKey::Operator(Operator::Is),
            "$eq" => FilterKey::Operator(Operator::Eq),
            "$gt" => FilterKey::Operator(Operator::Gt),
            "$lt" => FilterKey::Operator(Operator::Lt),
            "$ge" => FilterKey::Operator(Operator::Ge),
            "$gte" => FilterKey::Operator(Operator::Gte),
            "$le" => FilterKey::Operator(Operator::Le),
            "$lte" => FilterKey::Operator(Operator::Lte),
            "$ne" => FilterKey::Operator(Operator::Ne),
            "$contains" => FilterKey::Operator(Operator::Contains),
            "$includes" => FilterKey::Operator(Operator::Includes),
            "$exists" => FilterKey::Operator(Operator::Exists),
            "$notExists" => FilterKey::Operator(Operator::NotExists),
            other if other.starts_with('$') => {
                FilterKey::Operator(Operator::Unknown(other.to_string()))
            }
            field => FilterKey::Field(field.to_string()),
        }
    }

    /// Get the raw key string
    pub fn as_str(&self) -> &str {
        match self {
            FilterKey::Group(group) => group.as_str(),
            FilterKey::Operator(op) => op.as_str(),
            FilterKey::Field(name) => name,
        }
    }
}

/// A declarative filter value
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// A scalar (or opaque JSON) value, shorthand for equality
    Literal(Value),
    /// Ordered key/constraint pairs, in insertion order
    Object(Vec<(FilterKey, FilterValue)>),
    /// A sequence of filter values walked element-wise
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// The empty filter, matching everything
    pub fn empty() -> Self {
        FilterValue::Object(Vec::new())
    }

    /// Build a single-entry object
    pub fn entry(key: FilterKey, value: impl Into<FilterValue>) -> Self {
        FilterValue::Object(vec![(key, value.into())])
    }

    /// Build `{field: value}`
    pub fn field(name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::entry(FilterKey::Field(name.into()), value)
    }

    /// Returns true if compiling this value can produce no leaves
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Literal(_) => false,
            FilterValue::Object(entries) => entries.is_empty(),
            FilterValue::List(items) => items.iter().all(FilterValue::is_empty),
        }
    }

    /// Returns true if this is an object containing at least one group or
    /// operator key
    pub fn is_operator_object(&self) -> bool {
        match self {
            FilterValue::Object(entries) => entries
                .iter()
                .any(|(key, _)| !matches!(key, FilterKey::Field(_))),
            _ => false,
        }
    }

    /// Convert back to JSON, preserving key order
    pub fn to_json(&self) -> Value {
        match self {
            FilterValue::Literal(value) => value.clone(),
            FilterValue::Object(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    // Repeated keys cannot be expressed in a JSON object;
                    // fold them into a list so no constraint is lost.
                    match map.get_mut(key.as_str()) {
                        Some(Value::Array(existing)) if matches!(key, FilterKey::Group(_)) => {
                            existing.push(value.to_json());
                        }
                        Some(existing) => {
                            let previous = existing.take();
                            *existing = Value::Array(vec![previous, value.to_json()]);
                        }
                        None => {
                            map.insert(key.as_str().to_string(), value.to_json());
                        }
                    }
                }
                Value::Object(map)
            }
            FilterValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

impl Default for FilterValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => FilterValue::Object(
                map.into_iter()
                    .map(|(key, value)| (FilterKey::parse(&key), FilterValue::from(value)))
                    .collect(),
            ),
            Value::Array(items) => {
                FilterValue::List(items.into_iter().map(FilterValue::from).collect())
            }
            literal => FilterValue::Literal(literal),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Literal(Value::String(value.to_string()))
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Literal(Value::String(value))
    }
}

macro_rules! literal_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    FilterValue::Literal(Value::from(value))
                }
            }
        )*
    };
}

literal_from!(i32, i64, u32, u64);

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Literal(Value::from(value))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Literal(Value::Bool(value))
    }
}

impl From<Vec<FilterValue>> for FilterValue {
    fn from(items: Vec<FilterValue>) -> Self {
        FilterValue::List(items)
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
