//! Query DSL builder.
//!
//! Layers pagination, source projection, sort, filters and ranges on top of
//! a seeded [`QueryDocument`]. The steps always run in the same order:
//!
//! 1. window size from `pageSize`
//! 2. window offset `(page - 1) * pageSize`
//! 3. source includes from `fields`
//! 4. sort keys, in the given order
//! 5. filters, in the given order
//! 6. ranges, in the given order
//!
//! Building is a fold over that step list, so the same seed and parameters
//! always produce the same document.

use serde_json::{Map, Value};

use crate::types::{FilterClause, RangeClause, SearchParams};

use super::document::QueryDocument;

type BuildStep = fn(QueryDocument, &SearchParams) -> QueryDocument;

const BUILD_STEPS: [BuildStep; 6] = [
    apply_size,
    apply_offset,
    apply_projection,
    apply_sort,
    apply_filters,
    apply_ranges,
];

/// Builds the engine query body for `params` on top of `seed`.
pub fn build_query(seed: QueryDocument, params: &SearchParams) -> Value {
    layer(seed, params).into_value()
}

/// Builds a count body: the same match conditions without window, sort or
/// projection.
pub fn build_count_query(seed: QueryDocument, params: &SearchParams) -> Value {
    let mut body = build_query(seed, params);
    if let Some(obj) = body.as_object_mut() {
        obj.remove("size");
        obj.remove("from");
        obj.remove("sort");
        obj.remove("_source");
    }
    body
}

/// Applies every build step to `seed` without rendering it.
pub fn layer(seed: QueryDocument, params: &SearchParams) -> QueryDocument {
    BUILD_STEPS
        .iter()
        .fold(seed, |doc, step| step(doc, params))
}

fn apply_size(doc: QueryDocument, params: &SearchParams) -> QueryDocument {
    match params.window_size() {
        Some(size) => doc.with_size(size),
        None => doc,
    }
}

fn apply_offset(doc: QueryDocument, params: &SearchParams) -> QueryDocument {
    // A page without a page size has no defined offset and is skipped
    match params.window_offset() {
        Some(from) => doc.with_from(from),
        None => doc,
    }
}

fn apply_projection(doc: QueryDocument, params: &SearchParams) -> QueryDocument {
    if params.fields.is_empty() {
        return doc;
    }
    doc.with_source_includes(params.fields.clone())
}

fn apply_sort(doc: QueryDocument, params: &SearchParams) -> QueryDocument {
    params
        .sort
        .iter()
        .fold(doc, |doc, sort| doc.with_sort(&sort.field, sort.direction))
}

fn apply_filters(doc: QueryDocument, params: &SearchParams) -> QueryDocument {
    params
        .filter
        .iter()
        .fold(doc, |doc, filter| doc.with_filter(filter_clause(filter)))
}

fn apply_ranges(doc: QueryDocument, params: &SearchParams) -> QueryDocument {
    params
        .range
        .iter()
        .fold(doc, |doc, range| doc.with_filter(range_clause(range)))
}

/// Renders a filter as `{<type>: {<field>: <value>}}`.
pub fn filter_clause(filter: &FilterClause) -> Value {
    let mut condition = Map::new();
    condition.insert(filter.field.clone(), filter.value.clone());

    let mut clause = Map::new();
    clause.insert(
        filter.filter_type.as_str().to_string(),
        Value::Object(condition),
    );
    Value::Object(clause)
}

/// Renders a range as `{"range": {<field>: {"gte"?, "lte"?}}}`.
pub fn range_clause(range: &RangeClause) -> Value {
    let mut bounds = Map::new();
    if let Some(ref from) = range.from {
        bounds.insert("gte".to_string(), from.clone());
    }
    if let Some(ref to) = range.to {
        bounds.insert("lte".to_string(), to.clone());
    }

    let mut field = Map::new();
    field.insert(range.field.clone(), Value::Object(bounds));

    let mut clause = Map::new();
    clause.insert("range".to_string(), Value::Object(field));
    Value::Object(clause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{LeafClause, SeededSearch};
    use crate::types::{FilterType, SortDirective, TermQuery};
    use serde_json::json;

    fn build(params: &SearchParams) -> Value {
        build_query(params.seed(), params)
    }

    #[test]
    fn test_search_all_defaults() {
        let body = build(&SearchParams::new("docs"));
        assert_eq!(body, json!({ "query": { "match_all": {} } }));
    }

    #[test]
    fn test_pagination() {
        for (page, size) in [(1u32, 1u32), (1, 10), (2, 10), (7, 3)] {
            let params = SearchParams::new("docs")
                .with_page(page)
                .with_page_size(size);
            let body = build(&params);
            assert_eq!(body["size"], json!(size));
            assert_eq!(body["from"], json!(u64::from(page - 1) * u64::from(size)));
        }
    }

    #[test]
    fn test_page_without_page_size_applies_no_offset() {
        let body = build(&SearchParams::new("docs").with_page(3));
        assert!(body.get("from").is_none());
        assert!(body.get("size").is_none());
    }

    #[test]
    fn test_page_size_without_page() {
        let body = build(&SearchParams::new("docs").with_page_size(25));
        assert_eq!(body["size"], 25);
        assert!(body.get("from").is_none());
    }

    #[test]
    fn test_source_projection() {
        let body = build(&SearchParams::new("docs").with_fields(["title", "author"]));
        assert_eq!(body["_source"], json!({ "includes": ["title", "author"] }));
    }

    #[test]
    fn test_sort_order_preserved() {
        let params = SearchParams::new("docs")
            .with_sort(SortDirective::desc("created"))
            .with_sort(SortDirective::asc("title"))
            .with_sort(SortDirective::desc("_score"));
        let body = build(&params);
        assert_eq!(
            body["sort"],
            json!([
                { "created": { "order": "desc" } },
                { "title": { "order": "asc" } },
                { "_score": { "order": "desc" } }
            ])
        );
    }

    #[test]
    fn test_filters_are_conjunctive_and_ordered() {
        let params = SearchParams::new("docs")
            .with_filter(FilterClause::term("status", "open"))
            .with_filter(FilterClause::terms("tags", ["a", "b"]))
            .with_range(RangeClause::between("age", 18, 65));
        let body = build(&params);

        assert!(body["query"]["bool"].get("should").is_none());
        assert!(body["query"]["bool"].get("must").is_none());
        assert_eq!(
            body["query"]["bool"]["filter"],
            json!([
                { "term": { "status": "open" } },
                { "terms": { "tags": ["a", "b"] } },
                { "range": { "age": { "gte": 18, "lte": 65 } } }
            ])
        );
    }

    #[test]
    fn test_every_filter_type_uses_its_clause_name() {
        for filter_type in [
            FilterType::Term,
            FilterType::MatchPhrasePrefix,
            FilterType::Match,
            FilterType::MatchPhrase,
            FilterType::Fuzzy,
            FilterType::Prefix,
        ] {
            let clause = filter_clause(&FilterClause::new("title", filter_type, "rus"));
            assert_eq!(clause[filter_type.as_str()]["title"], json!("rus"));
        }
    }

    #[test]
    fn test_range_from_only() {
        let clause = range_clause(&RangeClause::new("age").with_from(18));
        let bounds = &clause["range"]["age"];
        assert_eq!(bounds["gte"], 18);
        assert!(bounds.get("lte").is_none());
    }

    #[test]
    fn test_range_to_only() {
        let clause = range_clause(&RangeClause::new("created").with_to("2024-01-01"));
        let bounds = &clause["range"]["created"];
        assert_eq!(bounds["lte"], "2024-01-01");
        assert!(bounds.get("gte").is_none());
    }

    #[test]
    fn test_leaf_is_kept_as_must_with_filters() {
        let query = TermQuery::new(
            SearchParams::new("docs").with_filter(FilterClause::term("lang", "en")),
            "status",
            "open",
        );
        let body = build_query(query.seed(), &query.params);
        assert_eq!(
            body["query"],
            json!({
                "bool": {
                    "must": [{ "term": { "status": "open" } }],
                    "filter": [{ "term": { "lang": "en" } }]
                }
            })
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let params = SearchParams::new("docs")
            .with_page(2)
            .with_page_size(10)
            .with_filter(FilterClause::term("b", 2))
            .with_filter(FilterClause::term("a", 1))
            .with_sort(SortDirective::asc("a"));
        let seed = QueryDocument::seeded(&LeafClause::Match {
            field: "body".to_string(),
            query: "rust".to_string(),
        });

        let first = build_query(seed.clone(), &params);
        let second = build_query(seed, &params);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_term_search_scenario() {
        let query = TermQuery::new(
            SearchParams::new("docs").with_page_size(10).with_page(2),
            "status",
            "open",
        );
        let body = build_query(query.seed(), &query.params);
        assert_eq!(body["query"], json!({ "term": { "status": "open" } }));
        assert_eq!(body["size"], 10);
        assert_eq!(body["from"], 10);
    }

    #[test]
    fn test_layer_keeps_document_inspectable() {
        let query = TermQuery::new(
            SearchParams::new("docs")
                .with_page(3)
                .with_page_size(5)
                .with_filter(FilterClause::term("tenant", "acme")),
            "status",
            "open",
        );

        let doc = layer(query.seed(), query.search_params());
        assert_eq!(doc.leaf(), Some(&json!({"term": {"status": "open"}})));
        assert_eq!(doc.size(), Some(5));
        assert_eq!(doc.from(), Some(10));
        assert_eq!(doc.filters(), &[json!({"term": {"tenant": "acme"}})]);

        let unpaged = layer(QueryDocument::new(), &SearchParams::new("docs"));
        assert_eq!(unpaged.leaf(), None);
        assert_eq!(unpaged.size(), None);
        assert_eq!(unpaged.from(), None);
    }

    #[test]
    fn test_count_query_strips_window() {
        let params = SearchParams::new("docs")
            .with_page(2)
            .with_page_size(10)
            .with_fields(["a"])
            .with_sort(SortDirective::asc("a"))
            .with_filter(FilterClause::term("a", 1));
        let body = build_count_query(params.seed(), &params);
        assert_eq!(
            body,
            json!({ "query": { "bool": { "filter": [{ "term": { "a": 1 } }] } } })
        );
    }
}
