//! # Table Handle
//!
//! Runs queries against one remote table: cache check, executor call, cache
//! fill. Bulk helpers page sequentially and never assume a total count.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, Stream, TryStreamExt};
use tracing::{debug, warn};

use super::executor::Record;
use super::page::Page;
use super::Client;
use crate::cache::CachedPage;
use crate::query::pagination::validate_batch_size;
use crate::query::{
    Navigation, Pagination, Query, QueryError, QueryResult, TableSchema, PAGINATION_MAX_SIZE,
};

/// Next query of a batch iteration, or the error that ends it
type BatchState = Option<QueryResult<Query>>;

/// Handle to a named remote table
#[derive(Debug, Clone)]
pub struct Table {
    client: Client,
    name: String,
    schema: Option<Arc<TableSchema>>,
}

impl Table {
    pub(crate) fn new(client: Client, name: String) -> Self {
        Self {
            client,
            name,
            schema: None,
        }
    }

    /// Clean constraints of queries built by [`Table::query`] against `schema`
    pub fn with_schema(mut self, schema: TableSchema) -> Self {
        self.schema = Some(Arc::new(schema));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_deref()
    }

    /// Empty query bound to this table's schema
    pub fn query(&self) -> Query {
        match &self.schema {
            Some(schema) => Query::with_schema(schema.clone()),
            None => Query::new(),
        }
    }

    /// Cache key of `query` on this table
    pub fn cache_key(&self, query: &Query) -> String {
        self.client.cache().key(&self.name, query)
    }

    /// Drop the cached result of `query`
    pub async fn invalidate(&self, query: &Query) -> QueryResult<()> {
        let key = self.cache_key(query);
        self.client.cache().delete(&key).await?;
        Ok(())
    }

    fn cache_ttl(&self, query: &Query) -> Duration {
        let cache = &self.client.config().cache;
        if !cache.enabled {
            return Duration::ZERO;
        }
        query.cache_ttl().unwrap_or_else(|| cache.default_ttl())
    }

    /// Fetch one page of `query`
    pub async fn get_paginated(&self, query: &Query) -> QueryResult<Page> {
        let metrics = self.client.metrics_registry();

        let body = match query.compile_body() {
            Ok(body) => body,
            Err(err) => {
                metrics.increment_queries_rejected();
                debug!(table = %self.name, code = err.code(), error = %err, "query rejected");
                return Err(err.into());
            }
        };

        let ttl = self.cache_ttl(query);
        let key = self.cache_key(query);
        if let Some(cached) = self.client.cache().lookup(&key, ttl).await {
            metrics.increment_queries_executed();
            return Ok(Page::new(self.clone(), query.clone(), cached.meta, cached.records));
        }

        let response = match self.client.executor().execute(&self.name, &body).await {
            Ok(response) => response,
            Err(err) => {
                metrics.increment_queries_failed();
                warn!(table = %self.name, code = err.code(), error = %err, "query failed");
                return Err(err.into());
            }
        };

        metrics.record_page(response.records.len());
        metrics.increment_queries_executed();
        debug!(
            table = %self.name,
            records = response.records.len(),
            more = response.meta.more,
            "page fetched"
        );

        if !ttl.is_zero() {
            let snapshot = CachedPage::new(response.meta.clone(), response.records.clone());
            self.client.cache().store(&key, snapshot, ttl).await;
        }

        Ok(Page::new(
            self.clone(),
            query.clone(),
            response.meta,
            response.records,
        ))
    }

    /// Collect up to the requested page size, default from configuration.
    ///
    /// Sizes above the page limit are fetched in several requests.
    pub async fn get_many(&self, query: &Query) -> QueryResult<Vec<Record>> {
        let requested = query.pagination().requested_size();
        let target = requested.unwrap_or(self.client.config().default_page_size);
        let batch = target.min(PAGINATION_MAX_SIZE);

        let first = query.paginate(query.pagination().with_size(batch));
        let mut page = self.get_paginated(&first).await?;
        let mut records = page.take_records();

        while page.meta().has_next() && records.len() < target as usize {
            page = page.next_page(Some(batch), None).await?;
            records.extend(page.take_records());
        }
        records.truncate(target as usize);

        if page.meta().has_next() && requested.is_none() {
            warn!(
                table = %self.name,
                returned = records.len(),
                "get_many does not return all results; paginate or use get_all"
            );
        }
        Ok(records)
    }

    /// Every matching record, fetched in configured batches
    pub async fn get_all(&self, query: &Query) -> QueryResult<Vec<Record>> {
        self.get_all_batched(query, self.client.config().batch_size)
            .await
    }

    /// Every matching record, fetched `batch_size` at a time
    pub async fn get_all_batched(&self, query: &Query, batch_size: u32) -> QueryResult<Vec<Record>> {
        let batches: Vec<Vec<Record>> = self.iter_batches(query, batch_size).try_collect().await?;
        Ok(batches.concat())
    }

    /// First matching record, if any
    pub async fn get_first(&self, query: &Query) -> QueryResult<Option<Record>> {
        let first = query.paginate(query.pagination().with_size(1));
        let page = self.get_paginated(&first).await?;
        Ok(page.into_records().into_iter().next())
    }

    /// First matching record; fails with [`QueryError::NotFound`] if none
    pub async fn get_first_or_err(&self, query: &Query) -> QueryResult<Record> {
        self.get_first(query).await?.ok_or(QueryError::NotFound)
    }

    /// Stream of record batches.
    ///
    /// Pages are requested lazily, one per poll. The first request keeps the
    /// query's filter and sort; later ones follow the returned cursor. The
    /// stream ends when the server reports no more results, or after the
    /// first error.
    pub fn iter_batches<'a>(
        &'a self,
        query: &Query,
        batch_size: u32,
    ) -> impl Stream<Item = QueryResult<Vec<Record>>> + 'a {
        let first = validate_batch_size(batch_size)
            .map(|size| query.paginate(query.pagination().with_size(size)))
            .map_err(QueryError::from);

        stream::try_unfold(Some(first), move |state| self.next_batch(state, batch_size))
    }

    async fn next_batch(
        &self,
        state: BatchState,
        batch_size: u32,
    ) -> QueryResult<Option<(Vec<Record>, BatchState)>> {
        let query = match state {
            Some(query) => query?,
            None => return Ok(None),
        };

        let page = self.get_paginated(&query).await?;
        let next = page.meta().has_next().then(|| {
            let pagination = Pagination::navigate(
                Navigation::Next,
                page.meta().cursor.clone(),
                Some(batch_size),
                None,
            );
            Ok(page.query().paginate(pagination))
        });
        Ok(Some((page.into_records(), next)))
    }
}
