//! Search engine collaborator.
//!
//! [`SearchEngine`] is the narrow surface the provider needs from the engine.
//! Every method returns the engine's raw JSON reply; interpreting it is the
//! normalizer's job. The default implementation, [`ElasticsearchEngine`],
//! talks to a real cluster; tests substitute an in-memory engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;

#[cfg(feature = "elasticsearch")]
mod elasticsearch;

#[cfg(feature = "elasticsearch")]
pub use self::elasticsearch::ElasticsearchEngine;

/// What a delete-by-query does when a document changed while it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Abort the whole operation.
    Abort,
    /// Skip the conflicting document and keep going.
    #[default]
    Proceed,
}

/// Options for a delete-by-query request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteByQueryOptions {
    /// Conflict handling.
    pub conflicts: ConflictPolicy,
    /// Whether the call waits for the deletion to finish.
    pub wait_for_completion: bool,
}

impl DeleteByQueryOptions {
    /// Runs as a background task and proceeds past conflicts.
    pub fn deferred() -> Self {
        Self {
            conflicts: ConflictPolicy::Proceed,
            wait_for_completion: false,
        }
    }
}

impl Default for DeleteByQueryOptions {
    fn default() -> Self {
        Self::deferred()
    }
}

/// The engine operations the provider depends on.
///
/// Implementations share one long-lived connection handle and must be safe
/// to call from many tasks at once.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Fetches one document, optionally restricted to `source_includes`.
    async fn get(
        &self,
        index: &str,
        id: &str,
        source_includes: &[String],
    ) -> Result<Value, EngineError>;

    /// Runs a search with the given query body.
    async fn search(&self, index: &str, body: Value) -> Result<Value, EngineError>;

    /// Runs several searches as one request. Reply slot `i` answers request `i`.
    async fn multi_search(&self, requests: Vec<(String, Value)>) -> Result<Value, EngineError>;

    /// Counts documents matching the given query body.
    async fn count(&self, index: &str, body: Value) -> Result<Value, EngineError>;

    /// Returns whether a document exists.
    async fn exists(&self, index: &str, id: &str) -> Result<bool, EngineError>;

    /// Stores a new document under `id`.
    async fn create(&self, index: &str, id: &str, body: Value) -> Result<Value, EngineError>;

    /// Merges `partial` into an existing document.
    async fn update(&self, index: &str, id: &str, partial: Value) -> Result<Value, EngineError>;

    /// Deletes a document.
    async fn delete(&self, index: &str, id: &str) -> Result<Value, EngineError>;

    /// Deletes every document matching the query body.
    async fn delete_by_query(
        &self,
        index: &str,
        body: Value,
        options: DeleteByQueryOptions,
    ) -> Result<Value, EngineError>;

    /// Runs a SQL query and returns its `columns` / `rows` reply.
    async fn sql_query(&self, query: &str) -> Result<Value, EngineError>;
}
