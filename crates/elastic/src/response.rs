//! Result normalization.
//!
//! Engine replies come in several historical shapes. Older clients wrap the
//! reply as `{"body": {...}, "statusCode": 200, ...}`; newer ones hand back the
//! body directly. Totals are either a bare integer or `{"value", "relation"}`.
//! Everything here detects the shape first and then reads one canonical form,
//! so callers always receive a [`SearchResult`] regardless of engine version.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ResponseError;
use crate::types::{ID_FIELD, MultiSearchItem, SearchResult, SubqueryFailure};

/// Keys only ever found at the top level of an unwrapped reply.
const REPLY_MARKERS: [&str; 6] = ["hits", "responses", "found", "columns", "count", "_source"];

/// Total hit count as reported by the engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    /// Older engines: a bare integer.
    Count(u64),
    /// Newer engines: the count plus whether it is exact (`eq`) or a lower bound (`gte`).
    Tracked {
        value: u64,
        #[serde(default)]
        relation: Option<String>,
    },
}

impl TotalHits {
    fn value(&self) -> u64 {
        match self {
            TotalHits::Count(value) => *value,
            TotalHits::Tracked { value, relation } => {
                if relation.as_deref() == Some("gte") {
                    tracing::debug!(total = value, "engine reported a lower-bound total");
                }
                *value
            }
        }
    }
}

/// Strips a client-side `{"body": ...}` wrapper, if present.
pub fn unwrap_body(raw: Value) -> Value {
    let wrapped = match raw.as_object() {
        Some(obj) => {
            obj.get("body").is_some_and(|b| b.is_object() || b.is_array())
                && !REPLY_MARKERS.iter().any(|key| obj.contains_key(*key))
        }
        None => false,
    };

    if !wrapped {
        return raw;
    }

    match raw {
        Value::Object(mut obj) => obj.remove("body").unwrap_or(Value::Null),
        other => other,
    }
}

/// Normalizes a search reply.
pub fn normalize_search<T: DeserializeOwned>(raw: Value) -> Result<SearchResult<T>, ResponseError> {
    search_page(&unwrap_body(raw), "search")
}

/// Normalizes a multi-search reply. Slot `i` corresponds to request `i`.
///
/// Sub-queries the engine rejected come back as [`SubqueryFailure`] with the
/// engine's error object unmodified; they do not fail the batch.
pub fn normalize_multi_search<T: DeserializeOwned>(
    raw: Value,
) -> Result<Vec<MultiSearchItem<T>>, ResponseError> {
    let body = unwrap_body(raw);
    let responses = body
        .get("responses")
        .ok_or_else(|| missing("msearch", "responses"))?
        .as_array()
        .ok_or_else(|| unexpected("msearch", "responses", &body["responses"]))?;

    responses
        .iter()
        .map(|entry| match entry.get("error") {
            Some(error) => Ok(Err(SubqueryFailure {
                status: entry
                    .get("status")
                    .and_then(Value::as_u64)
                    .and_then(|s| u16::try_from(s).ok()),
                error: error.clone(),
            })),
            None => search_page(entry, "msearch").map(Ok),
        })
        .collect()
}

/// Normalizes a get reply: the stored source, or `None` when the engine says
/// the document was not found.
pub fn normalize_get<T: DeserializeOwned>(raw: Value) -> Result<Option<T>, ResponseError> {
    let body = unwrap_body(raw);

    if body.get("found").and_then(Value::as_bool) == Some(false) {
        return Ok(None);
    }

    let source = match body.get("_source") {
        Some(Value::Null) | None => Value::Object(Map::new()),
        Some(source) => source.clone(),
    };

    Ok(Some(serde_json::from_value(source)?))
}

/// Normalizes a SQL reply by zipping column names against each row.
pub fn normalize_sql<T: DeserializeOwned>(raw: Value) -> Result<Vec<T>, ResponseError> {
    let body = unwrap_body(raw);

    let columns: Vec<String> = body
        .get("columns")
        .and_then(Value::as_array)
        .ok_or_else(|| missing("sql", "columns"))?
        .iter()
        .map(|column| {
            column
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| unexpected("sql", "columns", column))
        })
        .collect::<Result<_, _>>()?;

    let rows = match body.get("rows") {
        Some(Value::Array(rows)) => rows.as_slice(),
        None => &[],
        Some(other) => return Err(unexpected("sql", "rows", other)),
    };

    rows.iter()
        .map(|row| -> Result<T, ResponseError> {
            let values = row
                .as_array()
                .ok_or_else(|| unexpected("sql", "rows", row))?;
            let record: Map<String, Value> = columns
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), values.get(i).cloned().unwrap_or(Value::Null)))
                .collect();
            Ok(serde_json::from_value(Value::Object(record))?)
        })
        .collect()
}

/// Normalizes a count reply.
pub fn normalize_count(raw: Value) -> Result<u64, ResponseError> {
    let body = unwrap_body(raw);
    let count = body.get("count").ok_or_else(|| missing("count", "count"))?;
    count
        .as_u64()
        .ok_or_else(|| unexpected("count", "count", count))
}

/// Merges a hit's stored source with its engine identifier.
///
/// The identifier always wins: `_id` is set from the hit, and an `id` field in
/// the source is overwritten with the same value.
pub fn merge_identifier(hit: &Value) -> Result<Value, ResponseError> {
    let id = hit.get("_id").cloned().ok_or_else(|| missing("hit", "_id"))?;

    let mut doc = match hit.get("_source") {
        Some(Value::Object(source)) => source.clone(),
        Some(Value::Null) | None => Map::new(),
        Some(other) => return Err(unexpected("hit", "_source", other)),
    };

    if doc.contains_key("id") {
        doc.insert("id".to_string(), id.clone());
    }
    doc.insert(ID_FIELD.to_string(), id);

    Ok(Value::Object(doc))
}

fn search_page<T: DeserializeOwned>(
    body: &Value,
    operation: &str,
) -> Result<SearchResult<T>, ResponseError> {
    let hits = body.get("hits").ok_or_else(|| missing(operation, "hits"))?;
    let hit_list = match hits.get("hits") {
        Some(Value::Array(list)) => list.as_slice(),
        None => &[],
        Some(other) => return Err(unexpected(operation, "hits.hits", other)),
    };

    let total = match hits.get("total") {
        Some(Value::Null) | None => hit_list.len() as u64,
        Some(raw) => TotalHits::deserialize(raw)
            .map_err(|_| unexpected(operation, "hits.total", raw))?
            .value(),
    };

    let results = hit_list
        .iter()
        .map(|hit| -> Result<T, ResponseError> {
            Ok(serde_json::from_value(merge_identifier(hit)?)?)
        })
        .collect::<Result<Vec<T>, ResponseError>>()?;

    Ok(SearchResult::new(results, total))
}

fn missing(operation: &str, field: &str) -> ResponseError {
    ResponseError::MissingField {
        operation: operation.to_string(),
        field: field.to_string(),
    }
}

fn unexpected(operation: &str, field: &str, value: &Value) -> ResponseError {
    ResponseError::UnexpectedValue {
        operation: operation.to_string(),
        field: field.to_string(),
        value: value.clone(),
    }
}
