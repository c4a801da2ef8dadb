//! Parameter objects for the named search entry points and helpers.
//!
//! Every search entry point embeds a [`SearchParams`]; in JSON the entry-point
//! fields sit beside the shared ones
//! (`{"index": "docs", "searchField": "status", "term": "open", "pageSize": 10}`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::search_params::SearchParams;
use crate::error::ValidationError;

fn require(value: &str, field: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(())
}

/// Exact-term search on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermQuery {
    /// The field to match.
    pub search_field: String,
    /// The exact value.
    pub term: Value,
    /// Shared parameters.
    #[serde(flatten)]
    pub params: SearchParams,
}

impl TermQuery {
    /// Creates a term search.
    pub fn new(
        params: SearchParams,
        search_field: impl Into<String>,
        term: impl Into<Value>,
    ) -> Self {
        Self {
            search_field: search_field.into(),
            term: term.into(),
            params,
        }
    }

    /// Validates the request.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.search_field, "searchField")?;
        self.params.validate()
    }
}

/// Terms-set search on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermsQuery {
    /// The field to match.
    pub search_field: String,
    /// Accepted values.
    pub terms: Vec<Value>,
    /// Shared parameters.
    #[serde(flatten)]
    pub params: SearchParams,
}

impl TermsQuery {
    /// Creates a terms search.
    pub fn new<V: Into<Value>>(
        params: SearchParams,
        search_field: impl Into<String>,
        terms: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            search_field: search_field.into(),
            terms: terms.into_iter().map(Into::into).collect(),
            params,
        }
    }

    /// Validates the request.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.search_field, "searchField")?;
        if self.terms.is_empty() {
            return Err(ValidationError::missing("terms"));
        }
        self.params.validate()
    }
}

/// Scored full-text match on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuery {
    /// The field to search.
    pub search_field: String,
    /// The query text.
    pub query: String,
    /// Shared parameters.
    #[serde(flatten)]
    pub params: SearchParams,
}

impl MatchQuery {
    /// Creates a match search.
    pub fn new(
        params: SearchParams,
        search_field: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            search_field: search_field.into(),
            query: query.into(),
            params,
        }
    }

    /// Validates the request.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.search_field, "searchField")?;
        require(&self.query, "query")?;
        self.params.validate()
    }
}

/// How a multi-field search is expressed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiFieldMode {
    /// `multi_match`: the query text is analyzed against each field.
    #[default]
    MultiMatch,
    /// `query_string`: the query text uses the engine's query syntax.
    QueryString,
}

/// Full-text search across several fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiFieldQuery {
    /// The query text.
    pub query: String,
    /// Fields to search (empty = the engine's default fields).
    #[serde(default)]
    pub search_fields: Vec<String>,
    /// Clause type used for the search.
    #[serde(default)]
    pub mode: MultiFieldMode,
    /// Shared parameters.
    #[serde(flatten)]
    pub params: SearchParams,
}

impl MultiFieldQuery {
    /// Creates a multi-field search over the engine's default fields.
    pub fn new(params: SearchParams, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            search_fields: Vec::new(),
            mode: MultiFieldMode::default(),
            params,
        }
    }

    /// Restricts the searched fields.
    pub fn with_search_fields<S: Into<String>>(
        mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> Self {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the clause type.
    pub fn with_mode(mut self, mode: MultiFieldMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validates the request.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.query, "query")?;
        if self.search_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ValidationError::missing("searchFields"));
        }
        self.params.validate()
    }
}

/// Field-existence search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistsQuery {
    /// The field that must be present.
    pub search_field: String,
    /// Shared parameters.
    #[serde(flatten)]
    pub params: SearchParams,
}

impl ExistsQuery {
    /// Creates an existence search.
    pub fn new(params: SearchParams, search_field: impl Into<String>) -> Self {
        Self {
            search_field: search_field.into(),
            params,
        }
    }

    /// Validates the request.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.search_field, "searchField")?;
        self.params.validate()
    }
}

/// Get-by-id request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetParams {
    /// Target index.
    pub index: String,
    /// Document identifier.
    pub id: String,
    /// Fields to include (empty = all).
    #[serde(default)]
    pub fields: Vec<String>,
}

impl GetParams {
    /// Creates a get request returning all fields.
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            fields: Vec::new(),
        }
    }

    /// Restricts returned fields.
    pub fn with_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Validates the request.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.index, "index")?;
        require(&self.id, "id")
    }
}

/// Deferred deletion of documents older than a cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteByTime {
    /// Target index.
    pub index: String,
    /// Timestamp field compared against the cutoff.
    pub field: String,
    /// Age in seconds; documents at or before `now - seconds` are deleted.
    pub seconds: i64,
    /// `chrono` strftime pattern the cutoff is rendered with. Must sort the
    /// same way the field's values do.
    pub format: String,
}

impl DeleteByTime {
    /// Creates a delete-by-time request.
    pub fn new(
        index: impl Into<String>,
        field: impl Into<String>,
        seconds: i64,
        format: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            field: field.into(),
            seconds,
            format: format.into(),
        }
    }

    /// Validates the request.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.index, "index")?;
        require(&self.field, "field")?;
        require(&self.format, "format")
    }
}
