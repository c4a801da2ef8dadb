//! Core types for search parameters and results.

mod requests;
mod results;
mod search_params;

pub use requests::{
    DeleteByTime, ExistsQuery, GetParams, MatchQuery, MultiFieldMode, MultiFieldQuery, TermQuery,
    TermsQuery,
};
pub use results::{ID_FIELD, IDENTIFIER_FIELDS, MultiSearchItem, SearchResult, SubqueryFailure};
pub use search_params::{
    FilterClause, FilterType, RangeClause, SearchParams, SortDirection, SortDirective,
};
