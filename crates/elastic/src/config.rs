//! Client configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;

/// Default request timeout: ten minutes.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10 * 60 * 1000;

/// Configuration consumed when the engine client is constructed.
///
/// Built once at process start; the resulting client handle is shared for the
/// lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElasticConfig {
    /// Engine node address (e.g., `"http://localhost:9200"`).
    pub connection: String,

    /// Request timeout in milliseconds (default: 600000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            connection: "http://localhost:9200".to_string(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ElasticConfig {
    /// Creates a configuration for the given address with default timeout.
    pub fn new(connection: impl Into<String>) -> Self {
        Self {
            connection: connection.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout.
    pub fn with_request_timeout_ms(mut self, request_timeout_ms: u64) -> Self {
        self.request_timeout_ms = request_timeout_ms;
        self
    }

    /// Validates configuration invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let connection = self.connection.trim();
        if connection.is_empty() {
            return Err(ValidationError::InvalidConfig {
                message: "connection must not be empty".to_string(),
            });
        }

        let url = Url::parse(connection).map_err(|e| ValidationError::InvalidConfig {
            message: format!("connection '{}' is not a valid URL: {}", connection, e),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidConfig {
                message: "connection must start with http:// or https://".to_string(),
            });
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(ValidationError::InvalidConfig {
                message: format!("connection '{}' has no host", connection),
            });
        }

        if self.request_timeout_ms == 0 {
            return Err(ValidationError::InvalidConfig {
                message: "request_timeout_ms must be > 0".to_string(),
            });
        }

        Ok(())
    }
}
