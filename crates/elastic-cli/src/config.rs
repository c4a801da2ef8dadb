//! Command-line configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ELASTIC_CONNECTION` | http://localhost:9200 | Engine node address |
//! | `ELASTIC_REQUEST_TIMEOUT` | 600000 | Request timeout (milliseconds) |
//! | `ELASTIC_LOG_LEVEL` | info | Log level |

use clap::{Args, Parser, Subcommand};
use helios_elastic::ElasticConfig;
use helios_elastic::types::{SearchParams, SortDirective};
use serde_json::Value;

/// Query an Elasticsearch node from the command line.
#[derive(Debug, Clone, Parser)]
#[command(name = "hes")]
#[command(about = "Helios Elastic search client")]
pub struct CliConfig {
    /// Engine node address.
    #[arg(long, env = "ELASTIC_CONNECTION", default_value = "http://localhost:9200")]
    pub connection: String,

    /// Request timeout in milliseconds.
    #[arg(long, env = "ELASTIC_REQUEST_TIMEOUT", default_value = "600000")]
    pub request_timeout: u64,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "ELASTIC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level operations.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run a search and print the result envelope.
    Search {
        #[command(flatten)]
        window: WindowArgs,

        #[command(subcommand)]
        query: SearchQuery,
    },

    /// Fetch one document by identifier.
    Get {
        /// Target index.
        index: String,
        /// Document identifier.
        id: String,
        /// Fields to return (comma-separated).
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Run a SQL query and print one record per row.
    Sql {
        /// The SQL statement.
        query: String,
    },

    /// Start a background deletion of documents older than a cutoff.
    DeleteByTime {
        /// Target index.
        index: String,
        /// Timestamp field compared against the cutoff.
        field: String,
        /// Age in seconds.
        seconds: i64,
        /// strftime pattern for the cutoff.
        #[arg(long, default_value = "%Y-%m-%dT%H:%M:%S")]
        format: String,
    },
}

/// Leaf clause for the `search` command.
#[derive(Debug, Clone, Subcommand)]
pub enum SearchQuery {
    /// Match every document.
    All,
    /// Exact value on one field. JSON values (`42`, `true`) are sent typed.
    Term { field: String, value: String },
    /// Full-text match on one field.
    Match { field: String, text: String },
    /// Documents where the field has a value.
    Exists { field: String },
}

/// Shared search parameters.
#[derive(Debug, Clone, Args)]
pub struct WindowArgs {
    /// Target index.
    #[arg(short, long)]
    pub index: String,

    /// 1-based page number.
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size.
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Sort keys, `field` ascending or `-field` descending (comma-separated).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub sort: Vec<String>,

    /// Fields to return (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,
}

impl WindowArgs {
    /// Converts the arguments into search parameters.
    pub fn to_search_params(&self) -> SearchParams {
        let mut params = SearchParams::new(&self.index).with_fields(self.fields.iter().cloned());
        params.page = self.page;
        params.page_size = self.page_size;
        params.sort = self.sort.iter().map(|s| SortDirective::parse(s)).collect();
        params
    }
}

impl CliConfig {
    /// Validates the configuration, collecting every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.to_elastic_config().validate() {
            errors.push(e.to_string());
        }

        if let Command::Search { window, .. } = &self.command {
            if window.page.is_some() && window.page_size.is_none() {
                errors.push("--page requires --page-size".to_string());
            }
            if window.page == Some(0) {
                errors.push("Page numbers start at 1".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The library client configuration.
    pub fn to_elastic_config(&self) -> ElasticConfig {
        ElasticConfig::new(&self.connection).with_request_timeout_ms(self.request_timeout)
    }
}

/// Parses a term value as JSON, falling back to a plain string.
pub fn term_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
