//! Query DSL construction.
//!
//! Entry points seed a [`QueryDocument`] with their [`LeafClause`];
//! [`build_query`] layers the shared [`SearchParams`](crate::types::SearchParams)
//! on top and renders the engine body.

mod builder;
mod document;
mod leaf;

pub use builder::{build_count_query, build_query, filter_clause, layer, range_clause};
pub use document::QueryDocument;
pub use leaf::{LeafClause, SeededSearch};
