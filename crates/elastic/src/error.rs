//! Error types for the query layer.
//!
//! Errors are split by where they originate: the engine (transport failures
//! and non-success replies), the caller (parameter objects that fail boundary
//! validation), and the reply itself (a shape the normalizer cannot read).

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use serde_json::Value;
use thiserror::Error;

/// The primary error type for all provider operations.
#[derive(Error, Debug)]
pub enum ElasticError {
    /// Errors reported by the engine or the transport in front of it
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Parameter objects rejected before any request is sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Replies the normalizer could not interpret
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// A caller document could not be converted to JSON
    #[error("failed to serialize document: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Errors originating from the search engine or its transport.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The client could not be constructed for the configured address.
    #[error("connection to {connection} failed: {message}")]
    ConnectionFailed { connection: String, message: String },

    /// The request never produced a reply (network failure, timeout).
    #[error("{operation} transport error: {message}")]
    Transport { operation: String, message: String },

    /// The engine replied with a non-success status.
    #[error("{operation} failed with status {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    /// The requested document does not exist.
    #[error("document not found: {index}/{id}")]
    NotFound { index: String, id: String },
}

impl EngineError {
    /// Returns the HTTP status reported by the engine, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            EngineError::Status { status, .. } => Some(*status),
            EngineError::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Returns `true` if this error means the target document is absent.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Boundary validation failures for parameter objects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("missing required field: {field}")]
    MissingRequiredField { field: String },

    /// A filter value does not fit the filter type.
    #[error("invalid value for {filter_type} filter on '{field}': {message}")]
    InvalidFilterValue {
        field: String,
        filter_type: String,
        message: String,
    },

    /// A range clause has neither bound set.
    #[error("range on '{field}' has neither 'from' nor 'to'")]
    EmptyRange { field: String },

    /// A timestamp format pattern could not be parsed.
    #[error("invalid timestamp format: {format}")]
    InvalidTimestampFormat { format: String },

    /// The client configuration is unusable.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ValidationError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        ValidationError::MissingRequiredField {
            field: field.into(),
        }
    }
}

/// Replies whose shape the normalizer does not recognise.
#[derive(Error, Debug)]
pub enum ResponseError {
    /// A field the reply must carry is absent.
    #[error("malformed {operation} response: missing '{field}'")]
    MissingField { operation: String, field: String },

    /// A field is present but has the wrong JSON type.
    #[error("malformed {operation} response: unexpected '{field}' value {value}")]
    UnexpectedValue {
        operation: String,
        field: String,
        value: Value,
    },

    /// A document could not be deserialized into the caller's type.
    #[error("failed to deserialize document: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Result type for provider operations.
pub type ElasticResult<T> = Result<T, ElasticError>;
