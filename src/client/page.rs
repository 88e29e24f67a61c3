//! # Page
//!
//! One fetched page plus the query that produced it. Navigation derives a
//! cursor query from the page's cursor, so filter and sort are dropped.

use super::executor::Record;
use super::table::Table;
use crate::query::{Navigation, PageMeta, Pagination, Query, QueryResult, ValidationError};

/// A page of records
#[derive(Debug, Clone)]
pub struct Page {
    table: Table,
    query: Query,
    meta: PageMeta,
    records: Vec<Record>,
}

impl Page {
    pub(crate) fn new(table: Table, query: Query, meta: PageMeta, records: Vec<Record>) -> Self {
        Self {
            table,
            query,
            meta,
            records,
        }
    }

    /// The query this page answers
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the server reported more results
    pub fn has_next_page(&self) -> bool {
        self.meta.more
    }

    pub(crate) fn take_records(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.records)
    }

    /// Records after this page
    pub async fn next_page(&self, size: Option<u32>, offset: Option<u32>) -> QueryResult<Page> {
        self.navigate(Navigation::Next, size, offset).await
    }

    /// Records before this page
    pub async fn previous_page(&self, size: Option<u32>, offset: Option<u32>) -> QueryResult<Page> {
        self.navigate(Navigation::Previous, size, offset).await
    }

    /// First page of this page's result set
    pub async fn start_page(&self, size: Option<u32>, offset: Option<u32>) -> QueryResult<Page> {
        self.navigate(Navigation::Start, size, offset).await
    }

    /// Last page of this page's result set
    pub async fn end_page(&self, size: Option<u32>, offset: Option<u32>) -> QueryResult<Page> {
        self.navigate(Navigation::End, size, offset).await
    }

    async fn navigate(
        &self,
        navigation: Navigation,
        size: Option<u32>,
        offset: Option<u32>,
    ) -> QueryResult<Page> {
        if self.meta.cursor.is_empty() {
            return Err(ValidationError::MissingCursor.into());
        }
        let pagination = Pagination::navigate(navigation, self.meta.cursor.clone(), size, offset);
        self.table.get_paginated(&self.query.paginate(pagination)).await
    }
}
