//! Normalized result shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key under which each result carries its engine-assigned identifier.
pub const ID_FIELD: &str = "_id";

/// Identifier keys never stored inside a document body.
pub const IDENTIFIER_FIELDS: [&str; 2] = [ID_FIELD, "id"];

/// A page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult<T> {
    /// Matching documents, each merged with its identifier.
    pub results: Vec<T>,
    /// Total number of matches reported by the engine.
    ///
    /// When the engine only reports a lower bound, that bound is returned as-is.
    pub total: u64,
}

impl<T> SearchResult<T> {
    /// Creates a result page.
    pub fn new(results: Vec<T>, total: u64) -> Self {
        Self { results, total }
    }

    /// Number of documents in this page.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if this page holds no documents.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A sub-query the engine rejected inside an otherwise successful multi-search.
///
/// The error object is kept exactly as the engine reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryFailure {
    /// HTTP status reported for the sub-query.
    pub status: Option<u16>,
    /// The engine's error object.
    pub error: Value,
}

/// One slot of a multi-search reply.
pub type MultiSearchItem<T> = Result<SearchResult<T>, SubqueryFailure>;
