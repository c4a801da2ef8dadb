//! Helios Elastic Query Layer
//!
//! This crate builds Elasticsearch query documents from typed search
//! parameters and normalizes engine replies into a stable result envelope,
//! whatever reply shape the engine version produces.
//!
//! # Features
//!
//! - **Named entry points**: term, terms, match, multi-field match, exists,
//!   match-all, multi-search, raw body passthrough
//! - **Shared parameters**: pagination, sort, filters, inclusive ranges and
//!   field projection layered on every entry point
//! - **Response normalization**: wrapped and unwrapped replies, integer and
//!   object totals, identifier merging, SQL row zipping
//! - **Document helpers**: get, exists, create, upsert-style update,
//!   idempotent delete, deferred delete-by-time
//!
//! The `elasticsearch` feature (default) provides [`ElasticsearchEngine`], a
//! [`SearchEngine`] over the official client. Without it, callers supply
//! their own engine.
//!
//! # Architecture
//!
//! - [`types`] - Search parameters, per-entry-point requests and results
//! - [`query`] - Query document construction
//! - [`response`] - Result normalization
//! - [`client`] - The engine collaborator trait and its implementation
//! - [`provider`] - Entry points and helpers over a [`SearchEngine`]
//! - [`config`] - Client configuration
//! - [`error`] - Error types for all operations
//!
//! # Building a query
//!
//! ```
//! use helios_elastic::query::{SeededSearch, build_query};
//! use helios_elastic::types::{SearchParams, TermQuery};
//! use serde_json::json;
//!
//! let request = TermQuery::new(
//!     SearchParams::new("docs").with_page(2).with_page_size(10),
//!     "status",
//!     "open",
//! );
//!
//! let body = build_query(request.seed(), request.search_params());
//! assert_eq!(body["query"], json!({"term": {"status": "open"}}));
//! assert_eq!(body["size"], json!(10));
//! assert_eq!(body["from"], json!(10));
//! ```
//!
//! # Normalizing a reply
//!
//! ```
//! use helios_elastic::response::normalize_search;
//! use serde_json::{Value, json};
//!
//! let reply = json!({
//!     "body": {
//!         "hits": {
//!             "total": {"value": 1, "relation": "eq"},
//!             "hits": [{"_id": "a1", "_source": {"status": "open"}}]
//!         }
//!     },
//!     "statusCode": 200
//! });
//!
//! let page = normalize_search::<Value>(reply).unwrap();
//! assert_eq!(page.total, 1);
//! assert_eq!(page.results[0], json!({"_id": "a1", "status": "open"}));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod query;
pub mod response;
pub mod types;

// Re-export commonly used types at crate root
pub use client::{ConflictPolicy, DeleteByQueryOptions, SearchEngine};
pub use config::ElasticConfig;
pub use error::{ElasticError, ElasticResult, EngineError, ResponseError, ValidationError};
pub use provider::{ElasticProvider, cutoff_timestamp};
pub use query::{QueryDocument, SeededSearch};
pub use types::{SearchParams, SearchResult};

#[cfg(feature = "elasticsearch")]
pub use client::ElasticsearchEngine;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
