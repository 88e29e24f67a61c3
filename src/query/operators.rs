//! # Operator Library
//!
//! Stateless constructors that wrap each operator into the filter grammar.
//!
//! ```ignore
//! use recordql::query::operators::{ge, lt};
//! use recordql::query::Query;
//!
//! let q = Query::new().filter("age", lt(30)).filter("age", ge(20));
//! ```

use super::filter::{FilterKey, FilterValue, Group, Operator};

fn op(operator: Operator, value: impl Into<FilterValue>) -> FilterValue {
    FilterValue::entry(FilterKey::Operator(operator), value)
}

fn group<I, V>(group: Group, values: I) -> FilterValue
where
    I: IntoIterator<Item = V>,
    V: Into<FilterValue>,
{
    FilterValue::entry(
        FilterKey::Group(group),
        FilterValue::List(values.into_iter().map(Into::into).collect()),
    )
}

/// `{$is: value}`
pub fn is(value: impl Into<FilterValue>) -> FilterValue {
    op(Operator::Is, value)
}

/// `{$eq: value}`
pub fn eq(value: impl Into<FilterValue>) -> FilterValue {
    op(Operator::Eq, value)
}

/// `{$ne: value}`
pub fn ne(value: impl Into<FilterValue>) -> FilterValue {
    op(Operator::Ne, value)
}

/// `{$gt: value}`
pub fn gt(value: impl Into<FilterValue>) -> FilterValue {
    op(Operator::Gt, value)
}

/// `{$lt: value}`
pub fn lt(value: impl Into<FilterValue>) -> FilterValue {
    op(Operator::Lt, value)
}

/// `{$ge: value}`
pub fn ge(value: impl Into<FilterValue>) -> FilterValue {
    op(Operator::Ge, value)
}

/// `{$gte: value}`
pub fn gte(value: impl Into<FilterValue>) -> FilterValue {
    op(Operator::Gte, value)
}

/// `{$le: value}`
pub fn le(value: impl Into<FilterValue>) -> FilterValue {
    op(Operator::Le, value)
}

/// `{$lte: value}`
pub fn lte(value: impl Into<FilterValue>) -> FilterValue {
    op(Operator::Lte, value)
}

/// `{$contains: pattern}`
pub fn contains(pattern: impl Into<FilterValue>) -> FilterValue {
    op(Operator::Contains, pattern)
}

/// `{$includes: value}`, for multi-valued columns
pub fn includes(value: impl Into<FilterValue>) -> FilterValue {
    op(Operator::Includes, value)
}

/// `{$exists: column}`
pub fn exists(column: impl Into<String>) -> FilterValue {
    op(Operator::Exists, column.into())
}

/// `{$notExists: column}`
pub fn not_exists(column: impl Into<String>) -> FilterValue {
    op(Operator::NotExists, column.into())
}

/// `{$all: [values...]}`
pub fn all<I, V>(values: I) -> FilterValue
where
    I: IntoIterator<Item = V>,
    V: Into<FilterValue>,
{
    group(Group::All, values)
}

/// `{$any: [values...]}`
pub fn any<I, V>(values: I) -> FilterValue
where
    I: IntoIterator<Item = V>,
    V: Into<FilterValue>,
{
    group(Group::Any, values)
}

/// `{$not: [values...]}`
pub fn not<I, V>(values: I) -> FilterValue
where
    I: IntoIterator<Item = V>,
    V: Into<FilterValue>,
{
    group(Group::Not, values)
}

/// `{$none: [values...]}`
pub fn none<I, V>(values: I) -> FilterValue
where
    I: IntoIterator<Item = V>,
    V: Into<FilterValue>,
{
    group(Group::None, values)
}
