//! Leaf clauses seeded by each search entry point.

use serde_json::{Value, json};

use crate::error::ValidationError;
use crate::types::{
    ExistsQuery, MatchQuery, MultiFieldMode, MultiFieldQuery, SearchParams, TermQuery, TermsQuery,
};

use super::document::QueryDocument;

/// The innermost, scored search condition of a query document.
// Variant fields mirror the engine clause they render to
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum LeafClause {
    /// Every document matches.
    MatchAll,
    /// Exact value on one field.
    Term { field: String, value: Value },
    /// Any of a set of exact values on one field.
    Terms { field: String, values: Vec<Value> },
    /// Analyzed match on one field.
    Match { field: String, query: String },
    /// Analyzed match across fields; empty `fields` means the engine default.
    MultiMatch { query: String, fields: Vec<String> },
    /// Query-string syntax across fields; empty `fields` means the engine default.
    QueryString { query: String, fields: Vec<String> },
    /// The field has a value.
    Exists { field: String },
    /// A caller-provided clause, used verbatim.
    Raw(Value),
}

impl LeafClause {
    /// Renders the clause, or `None` for match-all.
    pub fn to_value(&self) -> Option<Value> {
        let clause = match self {
            LeafClause::MatchAll => return None,
            LeafClause::Term { field, value } => single_field("term", field, value.clone()),
            LeafClause::Terms { field, values } => {
                single_field("terms", field, Value::Array(values.clone()))
            }
            LeafClause::Match { field, query } => single_field("match", field, json!(query)),
            LeafClause::MultiMatch { query, fields } => with_fields("multi_match", query, fields),
            LeafClause::QueryString { query, fields } => with_fields("query_string", query, fields),
            LeafClause::Exists { field } => json!({ "exists": { "field": field } }),
            LeafClause::Raw(clause) => clause.clone(),
        };
        Some(clause)
    }
}

fn single_field(kind: &str, field: &str, value: Value) -> Value {
    let mut inner = serde_json::Map::new();
    inner.insert(field.to_string(), value);
    let mut outer = serde_json::Map::new();
    outer.insert(kind.to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn with_fields(kind: &str, query: &str, fields: &[String]) -> Value {
    let mut inner = json!({ "query": query });
    if !fields.is_empty() {
        inner["fields"] = json!(fields);
    }
    let mut outer = serde_json::Map::new();
    outer.insert(kind.to_string(), inner);
    Value::Object(outer)
}

/// A search request that knows its leaf clause and its shared parameters.
pub trait SeededSearch {
    /// The shared parameters layered on top of the leaf clause.
    fn search_params(&self) -> &SearchParams;

    /// The entry point's leaf clause.
    fn leaf(&self) -> LeafClause;

    /// Boundary validation for the whole request.
    fn check(&self) -> Result<(), ValidationError>;

    /// A query document seeded with the leaf clause.
    fn seed(&self) -> QueryDocument {
        QueryDocument::seeded(&self.leaf())
    }
}

impl SeededSearch for SearchParams {
    fn search_params(&self) -> &SearchParams {
        self
    }

    fn leaf(&self) -> LeafClause {
        LeafClause::MatchAll
    }

    fn check(&self) -> Result<(), ValidationError> {
        self.validate()
    }
}

impl SeededSearch for TermQuery {
    fn search_params(&self) -> &SearchParams {
        &self.params
    }

    fn leaf(&self) -> LeafClause {
        LeafClause::Term {
            field: self.search_field.clone(),
            value: self.term.clone(),
        }
    }

    fn check(&self) -> Result<(), ValidationError> {
        self.validate()
    }
}

impl SeededSearch for TermsQuery {
    fn search_params(&self) -> &SearchParams {
        &self.params
    }

    fn leaf(&self) -> LeafClause {
        LeafClause::Terms {
            field: self.search_field.clone(),
            values: self.terms.clone(),
        }
    }

    fn check(&self) -> Result<(), ValidationError> {
        self.validate()
    }
}

impl SeededSearch for MatchQuery {
    fn search_params(&self) -> &SearchParams {
        &self.params
    }

    fn leaf(&self) -> LeafClause {
        LeafClause::Match {
            field: self.search_field.clone(),
            query: self.query.clone(),
        }
    }

    fn check(&self) -> Result<(), ValidationError> {
        self.validate()
    }
}

impl SeededSearch for MultiFieldQuery {
    fn search_params(&self) -> &SearchParams {
        &self.params
    }

    fn leaf(&self) -> LeafClause {
        let query = self.query.clone();
        let fields = self.search_fields.clone();
        match self.mode {
            MultiFieldMode::MultiMatch => LeafClause::MultiMatch { query, fields },
            MultiFieldMode::QueryString => LeafClause::QueryString { query, fields },
        }
    }

    fn check(&self) -> Result<(), ValidationError> {
        self.validate()
    }
}

impl SeededSearch for ExistsQuery {
    fn search_params(&self) -> &SearchParams {
        &self.params
    }

    fn leaf(&self) -> LeafClause {
        LeafClause::Exists {
            field: self.search_field.clone(),
        }
    }

    fn check(&self) -> Result<(), ValidationError> {
        self.validate()
    }
}
