//! The produced interface: named search entry points and document helpers.
//!
//! [`ElasticProvider`] owns a [`SearchEngine`] and turns typed requests into
//! query documents, sends them, and normalizes whatever reply shape comes
//! back. Engine failures on the search paths are logged once with the
//! serialized request and then returned to the caller.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::client::{DeleteByQueryOptions, SearchEngine};
use crate::error::{ElasticError, ElasticResult, EngineError, ValidationError};
use crate::query::{QueryDocument, SeededSearch, build_count_query, build_query};
use crate::response::{
    normalize_count, normalize_get, normalize_multi_search, normalize_search, normalize_sql,
};
use crate::types::{
    DeleteByTime, ExistsQuery, GetParams, IDENTIFIER_FIELDS, MatchQuery, MultiFieldQuery,
    MultiSearchItem, SearchParams, SearchResult, TermQuery, TermsQuery,
};

#[cfg(feature = "elasticsearch")]
use crate::client::ElasticsearchEngine;
#[cfg(feature = "elasticsearch")]
use crate::config::ElasticConfig;

/// Search and document operations over a [`SearchEngine`].
#[derive(Debug, Clone)]
pub struct ElasticProvider<E> {
    engine: E,
}

#[cfg(feature = "elasticsearch")]
impl ElasticProvider<ElasticsearchEngine> {
    /// Validates `config` and builds a provider over a real cluster.
    pub fn connect(config: &ElasticConfig) -> ElasticResult<Self> {
        config.validate()?;
        Ok(Self::new(ElasticsearchEngine::new(config)?))
    }
}

impl<E: SearchEngine> ElasticProvider<E> {
    /// Creates a provider over an existing engine client.
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Returns the engine client.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Validates `request` and renders its query document without sending it.
    pub fn build_query<S: SeededSearch + ?Sized>(&self, request: &S) -> ElasticResult<Value> {
        request.check()?;
        let body = build_query(request.seed(), request.search_params());
        debug!(index = %request.search_params().index, query = %body, "Built query document");
        Ok(body)
    }

    /// Matches every document, subject to the shared parameters.
    pub async fn search_all<T: DeserializeOwned>(
        &self,
        params: &SearchParams,
    ) -> ElasticResult<SearchResult<T>> {
        self.run(params).await
    }

    /// Runs several match-all searches in one round trip.
    ///
    /// Slot `i` of the result answers `params[i]`. A rejected sub-query fails
    /// only its own slot.
    pub async fn search_all_multi<T: DeserializeOwned>(
        &self,
        params: &[SearchParams],
    ) -> ElasticResult<Vec<MultiSearchItem<T>>> {
        let mut requests = Vec::with_capacity(params.len());
        for item in params {
            let body = self.build_query(item)?;
            requests.push((item.index.clone(), body));
        }

        let outcome = async {
            let raw = self.engine.multi_search(requests).await?;
            Ok::<_, ElasticError>(normalize_multi_search(raw)?)
        }
        .await;

        outcome.inspect_err(|e| log_failure("msearch", params, e))
    }

    /// Exact-term search.
    pub async fn search_by_term<T: DeserializeOwned>(
        &self,
        request: &TermQuery,
    ) -> ElasticResult<SearchResult<T>> {
        self.run(request).await
    }

    /// Search for any of a set of exact terms.
    pub async fn search_by_terms<T: DeserializeOwned>(
        &self,
        request: &TermsQuery,
    ) -> ElasticResult<SearchResult<T>> {
        self.run(request).await
    }

    /// Full-text match on one field.
    pub async fn search_by_query<T: DeserializeOwned>(
        &self,
        request: &MatchQuery,
    ) -> ElasticResult<SearchResult<T>> {
        self.run(request).await
    }

    /// Full-text match across several fields.
    pub async fn search_by_query_multi_fields<T: DeserializeOwned>(
        &self,
        request: &MultiFieldQuery,
    ) -> ElasticResult<SearchResult<T>> {
        self.run(request).await
    }

    /// Documents where a field is present.
    pub async fn search_by_exists<T: DeserializeOwned>(
        &self,
        request: &ExistsQuery,
    ) -> ElasticResult<SearchResult<T>> {
        self.run(request).await
    }

    /// Layers `params` on a caller-seeded query document and runs it.
    pub async fn search_by_query_builder<T: DeserializeOwned>(
        &self,
        seed: QueryDocument,
        params: &SearchParams,
    ) -> ElasticResult<SearchResult<T>> {
        params.validate()?;
        let body = build_query(seed, params);
        debug!(index = %params.index, query = %body, "Built query document");
        self.search(&params.index, body).await
    }

    /// Sends a pre-built query body as is.
    pub async fn search_by_params<T: DeserializeOwned>(
        &self,
        index: &str,
        body: Value,
    ) -> ElasticResult<SearchResult<T>> {
        self.search(index, body).await
    }

    /// Sends `body` to `index` and normalizes the reply.
    pub async fn search<T: DeserializeOwned>(
        &self,
        index: &str,
        body: Value,
    ) -> ElasticResult<SearchResult<T>> {
        if index.trim().is_empty() {
            return Err(ValidationError::missing("index").into());
        }

        let outcome = async {
            let raw = self.engine.search(index, body.clone()).await?;
            Ok::<_, ElasticError>(normalize_search(raw)?)
        }
        .await;

        outcome.inspect_err(|e| log_failure("search", &body, e))
    }

    /// Counts the documents a request would match, ignoring its window.
    pub async fn count<S: SeededSearch + ?Sized>(&self, request: &S) -> ElasticResult<u64> {
        request.check()?;
        let params = request.search_params();
        let body = build_count_query(request.seed(), params);

        let raw = self.engine.count(&params.index, body).await?;
        Ok(normalize_count(raw)?)
    }

    /// Fetches one document by identifier.
    ///
    /// Returns [`EngineError::NotFound`] when the document does not exist.
    pub async fn get_by_id<T: DeserializeOwned>(&self, params: &GetParams) -> ElasticResult<T> {
        params.validate()?;

        let raw = self
            .engine
            .get(&params.index, &params.id, &params.fields)
            .await?;

        normalize_get(raw)?.ok_or_else(|| {
            EngineError::NotFound {
                index: params.index.clone(),
                id: params.id.clone(),
            }
            .into()
        })
    }

    /// Returns whether a document exists.
    pub async fn exists(&self, index: &str, id: &str) -> ElasticResult<bool> {
        Ok(self.engine.exists(index, id).await?)
    }

    /// Stores `item` under `id`. Identifier fields in `item` are not stored.
    pub async fn create<T: Serialize + ?Sized>(
        &self,
        index: &str,
        id: &str,
        item: &T,
    ) -> ElasticResult<()> {
        let body = stored_body(item)?;
        self.engine.create(index, id, body).await?;
        Ok(())
    }

    /// Merges `item` into the document under `id`, creating it if absent.
    ///
    /// The existence check and the write are separate requests; a concurrent
    /// writer on the same `id` can interleave between them.
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        index: &str,
        id: &str,
        item: &T,
    ) -> ElasticResult<()> {
        if !self.exists(index, id).await? {
            debug!(index, id, "Document absent, creating instead of updating");
            return self.create(index, id, item).await;
        }

        let partial = stored_body(item)?;
        self.engine.update(index, id, partial).await?;
        Ok(())
    }

    /// Deletes the document under `id`. Deleting an absent document succeeds.
    pub async fn delete(&self, index: &str, id: &str) -> ElasticResult<()> {
        if !self.exists(index, id).await? {
            debug!(index, id, "Document absent, nothing to delete");
            return Ok(());
        }

        self.engine.delete(index, id).await?;
        Ok(())
    }

    /// Starts a background deletion of documents whose `field` is at or
    /// before `now - seconds`.
    ///
    /// Returns the engine's task acknowledgement as soon as the job is
    /// accepted, not when the deletion finishes.
    pub async fn delete_by_time(&self, request: &DeleteByTime) -> ElasticResult<Value> {
        request.validate()?;
        let cutoff = cutoff_timestamp(Utc::now(), request.seconds, &request.format)?;
        let body = json!({
            "query": {
                "bool": {
                    "must": {
                        "range": { request.field.as_str(): { "lte": cutoff } }
                    }
                }
            }
        });

        debug!(index = %request.index, cutoff = %cutoff, "Submitting delete by time");

        let outcome = self
            .engine
            .delete_by_query(&request.index, body, DeleteByQueryOptions::deferred())
            .await
            .map_err(ElasticError::from);

        outcome.inspect_err(|e| log_failure("delete_by_time", request, e))
    }

    /// Runs a SQL query, returning one record per row keyed by column name.
    pub async fn run_sql_query<T: DeserializeOwned>(&self, query: &str) -> ElasticResult<Vec<T>> {
        if query.trim().is_empty() {
            return Err(ValidationError::missing("query").into());
        }

        let raw = self.engine.sql_query(query).await?;
        Ok(normalize_sql(raw)?)
    }

    async fn run<T, S>(&self, request: &S) -> ElasticResult<SearchResult<T>>
    where
        T: DeserializeOwned,
        S: SeededSearch + ?Sized,
    {
        let body = self.build_query(request)?;
        self.search(&request.search_params().index, body).await
    }
}

/// Renders `now - seconds` with a `chrono` strftime pattern.
pub fn cutoff_timestamp(
    now: DateTime<Utc>,
    seconds: i64,
    format: &str,
) -> Result<String, ValidationError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(ValidationError::InvalidTimestampFormat {
            format: format.to_string(),
        });
    }

    let cutoff = TimeDelta::try_seconds(seconds)
        .and_then(|age| now.checked_sub_signed(age))
        .ok_or_else(|| ValidationError::InvalidFilterValue {
            field: "seconds".to_string(),
            filter_type: "range".to_string(),
            message: format!("{} seconds is out of range", seconds),
        })?;

    Ok(cutoff.format_with_items(items.iter()).to_string())
}

/// Serializes `item` and drops the identifier fields.
fn stored_body<T: Serialize + ?Sized>(item: &T) -> ElasticResult<Value> {
    let mut body = serde_json::to_value(item).map_err(ElasticError::Serialization)?;
    if let Value::Object(map) = &mut body {
        for field in IDENTIFIER_FIELDS {
            map.remove(field);
        }
    }
    Ok(body)
}

fn log_failure<P: Serialize + ?Sized>(operation: &str, params: &P, e: &ElasticError) {
    let params = serde_json::to_string(params).unwrap_or_default();
    error!(operation, params = %params, error = %e, "Elasticsearch request failed");
}
