//! # Query Node
//!
//! Immutable query description. Every composition call returns a new node;
//! the receiver is never modified, so nodes can be shared freely.
//!
//! ```ignore
//! use recordql::query::{Query, SortDirection};
//!
//! let q = Query::new()
//!     .filter("plan", "free")
//!     .sort("name", SortDirection::Asc)
//!     .select(["name"]);
//! let body = q.compile_body()?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::body::QueryBody;
use super::cleanup::{clean_constraint, TableSchema};
use super::compiler::{compile, NormalizedExpression};
use super::errors::ValidationError;
use super::filter::{FilterKey, FilterValue, Group};
use super::pagination::{PageBody, Pagination};
use super::sort::{normalize, SortDirection, SortEntry};

/// Boolean groups accumulated by composition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    all: Vec<FilterValue>,
    any: Vec<FilterValue>,
    not: Vec<FilterValue>,
    none: Vec<FilterValue>,
}

impl QueryFilter {
    /// Returns true if no group has any clause
    pub fn is_empty(&self) -> bool {
        self.all.is_empty() && self.any.is_empty() && self.not.is_empty() && self.none.is_empty()
    }

    /// Clauses of one group
    pub fn group(&self, group: Group) -> &[FilterValue] {
        match group {
            Group::All => &self.all,
            Group::Any => &self.any,
            Group::Not => &self.not,
            Group::None => &self.none,
        }
    }

    fn group_mut(&mut self, group: Group) -> &mut Vec<FilterValue> {
        match group {
            Group::All => &mut self.all,
            Group::Any => &mut self.any,
            Group::Not => &mut self.not,
            Group::None => &mut self.none,
        }
    }

    /// `{$all: [...], $any: [...], $not: [...], $none: [...]}`, empty groups
    /// omitted
    pub fn to_filter_value(&self) -> FilterValue {
        let entries = [Group::All, Group::Any, Group::Not, Group::None]
            .into_iter()
            .filter(|g| !self.group(*g).is_empty())
            .map(|g| (FilterKey::Group(g), FilterValue::List(self.group(g).to_vec())))
            .collect();
        FilterValue::Object(entries)
    }

    /// The value this filter contributes when nested in another query's
    /// group. A lone `$all` clause stands for itself.
    pub fn as_sub_filter(&self) -> FilterValue {
        if self.any.is_empty() && self.not.is_empty() && self.none.is_empty() && self.all.len() == 1
        {
            return self.all[0].clone();
        }
        self.to_filter_value()
    }
}

/// Observable identity of a query, serialized for cache keys
#[derive(Debug, Serialize)]
pub struct QueryIdentity<'a> {
    pub columns: &'a [String],
    pub filter: Value,
    pub sort: &'a [SortEntry],
    pub pagination: PageBody,
}

/// Immutable query node
#[derive(Debug, Clone, Default)]
pub struct Query {
    filter: QueryFilter,
    sort: Vec<SortEntry>,
    columns: Vec<String>,
    pagination: Pagination,
    cache_ttl: Option<Duration>,
    schema: Option<Arc<TableSchema>>,
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.filter == other.filter
            && self.sort == other.sort
            && self.columns == other.columns
            && self.pagination == other.pagination
            && self.cache_ttl == other.cache_ttl
    }
}

impl Query {
    /// An empty query: all records, all columns, default page
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty query whose constraints are cleaned against `schema`
    pub fn with_schema(schema: Arc<TableSchema>) -> Self {
        Self {
            schema: Some(schema),
            ..Self::default()
        }
    }

    // ==================
    // Accessors
    // ==================

    pub fn filter_groups(&self) -> &QueryFilter {
        &self.filter
    }

    pub fn sort_entries(&self) -> &[SortEntry] {
        &self.sort
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl
    }

    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_deref()
    }

    /// The accumulated filter as one declarative value
    pub fn filter_value(&self) -> FilterValue {
        self.filter.to_filter_value()
    }

    // ==================
    // Composition
    // ==================

    /// Clone for a filter or sort change. A cursor already carries its
    /// filter and sort, so inherited ones are dropped rather than merged.
    fn derive_constrained(&self) -> Self {
        let mut next = self.clone();
        if next.pagination.is_cursor() {
            next.filter = QueryFilter::default();
            next.sort.clear();
        }
        next
    }

    fn push_groups<'a, I>(&self, group: Group, queries: I) -> Self
    where
        I: IntoIterator<Item = &'a Query>,
    {
        let mut next = self.derive_constrained();
        let clauses = queries
            .into_iter()
            .filter(|q| !q.filter.is_empty())
            .map(|q| q.filter.as_sub_filter());
        next.filter.group_mut(group).extend(clauses);
        next
    }

    /// Match records satisfying any of the given queries' filters
    pub fn any<'a, I>(&self, queries: I) -> Self
    where
        I: IntoIterator<Item = &'a Query>,
    {
        self.push_groups(Group::Any, queries)
    }

    /// Match records satisfying all of the given queries' filters
    pub fn all<'a, I>(&self, queries: I) -> Self
    where
        I: IntoIterator<Item = &'a Query>,
    {
        self.push_groups(Group::All, queries)
    }

    /// Exclude records matching the given queries' filters
    pub fn not<'a, I>(&self, queries: I) -> Self
    where
        I: IntoIterator<Item = &'a Query>,
    {
        self.push_groups(Group::Not, queries)
    }

    /// Match records satisfying none of the given queries' filters
    pub fn none<'a, I>(&self, queries: I) -> Self
    where
        I: IntoIterator<Item = &'a Query>,
    {
        self.push_groups(Group::None, queries)
    }

    /// Add `{column: value}` to the AND group
    pub fn filter(&self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        let column = column.into();
        let value = clean_constraint(self.schema(), &column, value.into());
        let mut next = self.derive_constrained();
        next.filter.all.push(FilterValue::field(column, value));
        next
    }

    /// Add every entry of a filter object to the AND group, one clause per
    /// key
    pub fn filter_object(&self, object: impl Into<FilterValue>) -> Self {
        let mut next = self.derive_constrained();
        match object.into() {
            FilterValue::Object(entries) => {
                for (key, value) in entries {
                    let value = match &key {
                        FilterKey::Field(column) => clean_constraint(self.schema(), column, value),
                        _ => value,
                    };
                    next.filter.all.push(FilterValue::entry(key, value));
                }
            }
            other if other.is_empty() => {}
            other => next.filter.all.push(other),
        }
        next
    }

    /// Append a sort entry
    pub fn sort(&self, column: impl Into<String>, direction: SortDirection) -> Self {
        let mut next = self.derive_constrained();
        next.sort.push(SortEntry::new(column, direction));
        next
    }

    /// Append entries from sort shorthand
    pub fn sort_by(&self, sort: &Value) -> Result<Self, ValidationError> {
        let entries = normalize(sort)?;
        let mut next = self.derive_constrained();
        next.sort.extend(entries);
        Ok(next)
    }

    /// Project the given columns
    pub fn select<I, S>(&self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.columns = columns.into_iter().map(Into::into).collect();
        next
    }

    /// Cache results for `ttl`; zero disables caching
    pub fn cache(&self, ttl: Duration) -> Self {
        let mut next = self.clone();
        next.cache_ttl = Some(ttl);
        next
    }

    /// Replace the pagination. Switching to a cursor drops filter and sort.
    pub fn paginate(&self, pagination: Pagination) -> Self {
        let mut next = self.clone();
        if pagination.is_cursor() {
            next.filter = QueryFilter::default();
            next.sort.clear();
        }
        next.pagination = pagination;
        next
    }

    // ==================
    // Compilation
    // ==================

    /// Compile the accumulated filter
    pub fn compile_filter(&self) -> NormalizedExpression {
        compile(&self.filter_value())
    }

    /// Build the wire body, validating pagination and sort first
    pub fn compile_body(&self) -> Result<QueryBody, ValidationError> {
        self.pagination.validate()?;
        for entry in &self.sort {
            entry.validate()?;
        }
        if self.pagination.is_cursor() && (!self.filter.is_empty() || !self.sort.is_empty()) {
            return Err(ValidationError::CursorWithFilterOrSort);
        }

        let filter = self.compile_filter();
        Ok(QueryBody {
            filter: (!filter.is_empty()).then_some(filter),
            sort: self.sort.clone(),
            page: (!self.pagination.is_unset()).then(|| self.pagination.to_body()),
            columns: self.columns.clone(),
        })
    }

    /// The parts of the query that determine its result
    pub fn identity(&self) -> QueryIdentity<'_> {
        QueryIdentity {
            columns: &self.columns,
            filter: self.filter_value().to_json(),
            sort: &self.sort,
            pagination: self.pagination.to_body(),
        }
    }
}
