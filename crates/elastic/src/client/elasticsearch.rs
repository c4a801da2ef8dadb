//! [`SearchEngine`] over the official `elasticsearch` client.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use elasticsearch::http::request::JsonBody;
use elasticsearch::http::response::Response;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::params::Conflicts;
use elasticsearch::{
    CountParts, CreateParts, DeleteByQueryParts, DeleteParts, Elasticsearch, ExistsParts,
    GetParts, MsearchParts, SearchParts, UpdateParts,
};
use serde_json::{Value, json};

use crate::config::ElasticConfig;
use crate::error::EngineError;

use super::{ConflictPolicy, DeleteByQueryOptions, SearchEngine};

/// Engine client backed by a single Elasticsearch node.
#[derive(Clone)]
pub struct ElasticsearchEngine {
    client: Elasticsearch,
    connection: String,
}

impl Debug for ElasticsearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchEngine")
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}

impl ElasticsearchEngine {
    /// Builds the client from configuration. No request is sent.
    pub fn new(config: &ElasticConfig) -> Result<Self, EngineError> {
        let connection_failed = |message: String| EngineError::ConnectionFailed {
            connection: config.connection.clone(),
            message,
        };

        let url: elasticsearch::http::Url = config
            .connection
            .parse()
            .map_err(|e| connection_failed(format!("Invalid URL: {}", e)))?;

        let transport = TransportBuilder::new(SingleNodeConnectionPool::new(url))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| connection_failed(format!("Failed to build transport: {}", e)))?;

        tracing::info!(
            connection = %config.connection,
            request_timeout_ms = config.request_timeout_ms,
            "Elasticsearch client initialized"
        );

        Ok(Self {
            client: Elasticsearch::new(transport),
            connection: config.connection.clone(),
        })
    }

    /// Returns the underlying client for operations this crate does not wrap.
    pub fn client(&self) -> &Elasticsearch {
        &self.client
    }
}

fn transport_error(operation: &str, e: elasticsearch::Error) -> EngineError {
    EngineError::Transport {
        operation: operation.to_string(),
        message: e.to_string(),
    }
}

/// Reads a reply body, turning non-success statuses into errors.
async fn read_json(
    operation: &str,
    response: Result<Response, elasticsearch::Error>,
) -> Result<Value, EngineError> {
    let response = response.map_err(|e| transport_error(operation, e))?;

    let status = response.status_code();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(EngineError::Status {
            operation: operation.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| transport_error(operation, e))
}

#[async_trait]
impl SearchEngine for ElasticsearchEngine {
    async fn get(
        &self,
        index: &str,
        id: &str,
        source_includes: &[String],
    ) -> Result<Value, EngineError> {
        let includes: Vec<&str> = source_includes.iter().map(String::as_str).collect();
        let mut request = self.client.get(GetParts::IndexId(index, id));
        if !includes.is_empty() {
            request = request._source_includes(&includes);
        }

        match read_json("get", request.send().await).await {
            Err(e) if e.is_not_found() => Err(EngineError::NotFound {
                index: index.to_string(),
                id: id.to_string(),
            }),
            other => other,
        }
    }

    async fn search(&self, index: &str, body: Value) -> Result<Value, EngineError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await;
        read_json("search", response).await
    }

    async fn multi_search(&self, requests: Vec<(String, Value)>) -> Result<Value, EngineError> {
        let mut lines: Vec<JsonBody<Value>> = Vec::with_capacity(requests.len() * 2);
        for (index, body) in requests {
            lines.push(JsonBody::new(json!({ "index": index })));
            lines.push(JsonBody::new(body));
        }

        let response = self
            .client
            .msearch(MsearchParts::None)
            .body(lines)
            .send()
            .await;
        read_json("msearch", response).await
    }

    async fn count(&self, index: &str, body: Value) -> Result<Value, EngineError> {
        let response = self
            .client
            .count(CountParts::Index(&[index]))
            .body(body)
            .send()
            .await;
        read_json("count", response).await
    }

    async fn exists(&self, index: &str, id: &str) -> Result<bool, EngineError> {
        let response = self
            .client
            .exists(ExistsParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| transport_error("exists", e))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(EngineError::Status {
                operation: "exists".to_string(),
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn create(&self, index: &str, id: &str, body: Value) -> Result<Value, EngineError> {
        let response = self
            .client
            .create(CreateParts::IndexId(index, id))
            .body(body)
            .send()
            .await;
        read_json("create", response).await
    }

    async fn update(&self, index: &str, id: &str, partial: Value) -> Result<Value, EngineError> {
        let response = self
            .client
            .update(UpdateParts::IndexId(index, id))
            .body(json!({ "doc": partial }))
            .send()
            .await;
        read_json("update", response).await
    }

    async fn delete(&self, index: &str, id: &str) -> Result<Value, EngineError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .send()
            .await;
        read_json("delete", response).await
    }

    async fn delete_by_query(
        &self,
        index: &str,
        body: Value,
        options: DeleteByQueryOptions,
    ) -> Result<Value, EngineError> {
        let conflicts = match options.conflicts {
            ConflictPolicy::Abort => Conflicts::Abort,
            ConflictPolicy::Proceed => Conflicts::Proceed,
        };

        let response = self
            .client
            .delete_by_query(DeleteByQueryParts::Index(&[index]))
            .conflicts(conflicts)
            .wait_for_completion(options.wait_for_completion)
            .body(body)
            .send()
            .await;
        read_json("delete_by_query", response).await
    }

    async fn sql_query(&self, query: &str) -> Result<Value, EngineError> {
        let response = self
            .client
            .sql()
            .query()
            .body(json!({ "query": query }))
            .send()
            .await;
        read_json("sql", response).await
    }
}
