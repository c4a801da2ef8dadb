//! Query document accumulator.
//!
//! A [`QueryDocument`] is a plain value: every `with_*` method consumes the
//! document and returns an extended copy, so partial builds can be cloned,
//! inspected and reused freely. [`QueryDocument::into_value`] renders the
//! engine's JSON body.

use serde_json::{Map, Value, json};

use crate::types::SortDirection;

use super::leaf::LeafClause;

/// An engine query document under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDocument {
    leaf: Option<Value>,
    filters: Vec<Value>,
    size: Option<u32>,
    from: Option<u64>,
    sort: Vec<Value>,
    source_includes: Vec<String>,
}

impl QueryDocument {
    /// Creates an empty document (matches every document).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document seeded with a leaf clause.
    pub fn seeded(leaf: &LeafClause) -> Self {
        Self {
            leaf: leaf.to_value(),
            ..Default::default()
        }
    }

    /// Replaces the leaf clause with a raw engine clause.
    pub fn with_query(mut self, clause: Value) -> Self {
        self.leaf = Some(clause);
        self
    }

    /// Sets the result-window size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the result-window offset.
    pub fn with_from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    /// Sets the source-projection includes.
    pub fn with_source_includes(mut self, fields: Vec<String>) -> Self {
        self.source_includes = fields;
        self
    }

    /// Appends a sort key after the existing ones.
    pub fn with_sort(mut self, field: &str, direction: SortDirection) -> Self {
        let mut key = Map::new();
        key.insert(field.to_string(), json!({ "order": direction.as_str() }));
        self.sort.push(Value::Object(key));
        self
    }

    /// Appends a non-scoring clause ANDed with the existing ones.
    pub fn with_filter(mut self, clause: Value) -> Self {
        self.filters.push(clause);
        self
    }

    /// The leaf clause, if any.
    pub fn leaf(&self) -> Option<&Value> {
        self.leaf.as_ref()
    }

    /// Filter clauses in the order they were added.
    pub fn filters(&self) -> &[Value] {
        &self.filters
    }

    /// Result-window size.
    pub fn size(&self) -> Option<u32> {
        self.size
    }

    /// Result-window offset.
    pub fn from(&self) -> Option<u64> {
        self.from
    }

    /// Renders the engine query body.
    pub fn into_value(self) -> Value {
        let query = match (self.leaf, self.filters.is_empty()) {
            (None, true) => json!({ "match_all": {} }),
            (Some(leaf), true) => leaf,
            (leaf, false) => {
                let mut bool_query = Map::new();
                if let Some(leaf) = leaf {
                    bool_query.insert("must".to_string(), json!([leaf]));
                }
                bool_query.insert("filter".to_string(), Value::Array(self.filters));
                json!({ "bool": bool_query })
            }
        };

        let mut body = json!({ "query": query });

        if let Some(size) = self.size {
            body["size"] = json!(size);
        }

        if let Some(from) = self.from {
            body["from"] = json!(from);
        }

        if !self.sort.is_empty() {
            body["sort"] = Value::Array(self.sort);
        }

        if !self.source_includes.is_empty() {
            body["_source"] = json!({ "includes": self.source_includes });
        }

        body
    }
}
