//! Declarative search parameters.
//!
//! [`SearchParams`] carries everything a caller can layer on top of an entry
//! point's leaf clause: the target index, pagination, sort order, source
//! projection, conjunctive filters and inclusive ranges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Descending order.
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Returns the engine's name for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(format!("unknown sort direction: {}", s)),
        }
    }
}

/// A sort directive. Earlier directives take priority over later ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortDirective {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    #[serde(default, alias = "dir")]
    pub direction: SortDirection,
}

impl SortDirective {
    /// Creates a sort directive.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Ascending sort on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    /// Descending sort on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// Parses a sort value (e.g., "-created" for descending).
    pub fn parse(s: &str) -> Self {
        match s.strip_prefix('-') {
            Some(stripped) => Self::desc(stripped),
            None => Self::asc(s),
        }
    }
}

/// The clause type used for a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Exact value.
    #[default]
    Term,
    /// Any of a set of exact values.
    Terms,
    /// Phrase whose last word is a prefix.
    MatchPhrasePrefix,
    /// Analyzed match.
    Match,
    /// Analyzed phrase.
    MatchPhrase,
    /// Edit-distance match.
    Fuzzy,
    /// Term prefix.
    Prefix,
}

impl FilterType {
    /// Returns the engine's clause name for this filter type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Term => "term",
            FilterType::Terms => "terms",
            FilterType::MatchPhrasePrefix => "match_phrase_prefix",
            FilterType::Match => "match",
            FilterType::MatchPhrase => "match_phrase",
            FilterType::Fuzzy => "fuzzy",
            FilterType::Prefix => "prefix",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "term" => Ok(FilterType::Term),
            "terms" => Ok(FilterType::Terms),
            "match_phrase_prefix" => Ok(FilterType::MatchPhrasePrefix),
            "match" => Ok(FilterType::Match),
            "match_phrase" => Ok(FilterType::MatchPhrase),
            "fuzzy" => Ok(FilterType::Fuzzy),
            "prefix" => Ok(FilterType::Prefix),
            _ => Err(format!("unknown filter type: {}", s)),
        }
    }
}

/// A non-scoring filter, ANDed with every other filter and range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    /// The field to filter on.
    pub field: String,
    /// The clause type (default: `term`).
    #[serde(rename = "type", default)]
    pub filter_type: FilterType,
    /// The value to compare against. An array for `terms`.
    pub value: Value,
}

impl FilterClause {
    /// Creates a filter of the given type.
    pub fn new(field: impl Into<String>, filter_type: FilterType, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            filter_type,
            value: value.into(),
        }
    }

    /// Exact-term filter.
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterType::Term, value)
    }

    /// Exact-terms-set filter.
    pub fn terms<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::new(field, FilterType::Terms, Value::Array(values))
    }

    /// Validates the filter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.field.trim().is_empty() {
            return Err(ValidationError::missing("filter.field"));
        }

        if self.filter_type == FilterType::Terms && !self.value.is_array() {
            return Err(ValidationError::InvalidFilterValue {
                field: self.field.clone(),
                filter_type: self.filter_type.to_string(),
                message: "expected an array of values".to_string(),
            });
        }

        Ok(())
    }
}

/// An inclusive range filter. Either bound may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeClause {
    /// The field to range over.
    pub field: String,
    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Value>,
    /// Inclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,
}

impl RangeClause {
    /// Creates an unbounded range on `field`; set at least one bound.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            from: None,
            to: None,
        }
    }

    /// Range with both bounds.
    pub fn between(
        field: impl Into<String>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        Self::new(field).with_from(from).with_to(to)
    }

    /// Sets the inclusive lower bound.
    pub fn with_from(mut self, from: impl Into<Value>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Sets the inclusive upper bound.
    pub fn with_to(mut self, to: impl Into<Value>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Validates the range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.field.trim().is_empty() {
            return Err(ValidationError::missing("range.field"));
        }
        if self.from.is_none() && self.to.is_none() {
            return Err(ValidationError::EmptyRange {
                field: self.field.clone(),
            });
        }
        Ok(())
    }
}

/// Per-request search parameters shared by every entry point.
///
/// Deserializes from the camelCase parameter bag callers send
/// (`{"index": "docs", "pageSize": 10, "page": 2, ...}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Target index (required).
    pub index: String,

    /// Fields to include in returned documents (empty = all).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    /// 1-based page number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Page size. Absent means the engine default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Sort directives in priority order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortDirective>,

    /// Conjunctive filters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<FilterClause>,

    /// Conjunctive inclusive ranges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub range: Vec<RangeClause>,
}

impl SearchParams {
    /// Creates parameters targeting `index`.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            ..Default::default()
        }
    }

    /// Restricts returned fields.
    pub fn with_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the 1-based page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Appends a sort directive.
    pub fn with_sort(mut self, sort: SortDirective) -> Self {
        self.sort.push(sort);
        self
    }

    /// Appends a filter.
    pub fn with_filter(mut self, filter: FilterClause) -> Self {
        self.filter.push(filter);
        self
    }

    /// Appends a range.
    pub fn with_range(mut self, range: RangeClause) -> Self {
        self.range.push(range);
        self
    }

    /// Returns the result-window size, if one applies.
    ///
    /// Zero is treated as unset.
    pub fn window_size(&self) -> Option<u32> {
        self.page_size.filter(|size| *size > 0)
    }

    /// Returns the result-window offset, if one applies.
    ///
    /// A page without a page size yields no offset.
    pub fn window_offset(&self) -> Option<u64> {
        let page = self.page.filter(|page| *page > 0)?;
        let size = self.window_size()?;
        Some(u64::from(page - 1) * u64::from(size))
    }

    /// Validates the parameters.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.index.trim().is_empty() {
            return Err(ValidationError::missing("index"));
        }

        if self.sort.iter().any(|s| s.field.trim().is_empty()) {
            return Err(ValidationError::missing("sort.field"));
        }

        for filter in &self.filter {
            filter.validate()?;
        }

        for range in &self.range {
            range.validate()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_directive_parse() {
        let asc = SortDirective::parse("created");
        assert_eq!(asc.field, "created");
        assert_eq!(asc.direction, SortDirection::Ascending);

        let desc = SortDirective::parse("-created");
        assert_eq!(desc.field, "created");
        assert_eq!(desc.direction, SortDirection::Descending);
    }

    #[test]
    fn test_sort_accepts_dir_alias() {
        let sort: SortDirective =
            serde_json::from_value(json!({"field": "name", "dir": "desc"})).unwrap();
        assert_eq!(sort, SortDirective::desc("name"));
    }

    #[test]
    fn test_filter_type_defaults_to_term() {
        let filter: FilterClause =
            serde_json::from_value(json!({"field": "status", "value": "open"})).unwrap();
        assert_eq!(filter.filter_type, FilterType::Term);
    }

    #[test]
    fn test_filter_type_round_trip_names() {
        for name in [
            "term",
            "terms",
            "match_phrase_prefix",
            "match",
            "match_phrase",
            "fuzzy",
            "prefix",
        ] {
            let parsed: FilterType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
            assert_eq!(serde_json::to_value(parsed).unwrap(), json!(name));
        }
        assert!("regexp".parse::<FilterType>().is_err());
    }

    #[test]
    fn test_params_from_camel_case_bag() {
        let params: SearchParams = serde_json::from_value(json!({
            "index": "docs",
            "pageSize": 10,
            "page": 2,
            "fields": ["title"],
            "sort": [{"field": "created", "dir": "desc"}],
            "filter": [{"field": "tags", "type": "terms", "value": ["a", "b"]}],
            "range": [{"field": "age", "from": 18}]
        }))
        .unwrap();

        assert_eq!(params.index, "docs");
        assert_eq!(params.page_size, Some(10));
        assert_eq!(params.page, Some(2));
        assert_eq!(params.filter[0].filter_type, FilterType::Terms);
        assert_eq!(params.range[0].to, None);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_window_offset() {
        let params = SearchParams::new("docs").with_page(3).with_page_size(25);
        assert_eq!(params.window_size(), Some(25));
        assert_eq!(params.window_offset(), Some(50));
    }

    #[test]
    fn test_window_offset_without_page_size() {
        let params = SearchParams::new("docs").with_page(3);
        assert_eq!(params.window_size(), None);
        assert_eq!(params.window_offset(), None);
    }

    #[test]
    fn test_zero_values_are_unset() {
        let params = SearchParams::new("docs").with_page(0).with_page_size(0);
        assert_eq!(params.window_size(), None);
        assert_eq!(params.window_offset(), None);
    }

    #[test]
    fn validate_rejects_empty_index() {
        let err = SearchParams::new("").validate().unwrap_err();
        assert_eq!(err, ValidationError::missing("index"));
    }

    #[test]
    fn validate_rejects_scalar_terms_filter() {
        let params = SearchParams::new("docs").with_filter(FilterClause::new(
            "tags",
            FilterType::Terms,
            "single",
        ));
        assert!(matches!(
            params.validate(),
            Err(ValidationError::InvalidFilterValue { .. })
        ));
    }

    #[test]
    fn validate_rejects_unbounded_range() {
        let params = SearchParams::new("docs").with_range(RangeClause::new("age"));
        assert_eq!(
            params.validate(),
            Err(ValidationError::EmptyRange {
                field: "age".to_string()
            })
        );
    }

    #[test]
    fn validate_accepts_one_sided_range() {
        let params = SearchParams::new("docs").with_range(RangeClause::new("age").with_to(65));
        assert!(params.validate().is_ok());
    }
}
