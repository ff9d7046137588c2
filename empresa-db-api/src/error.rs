//! Error types for the registry API

use crate::export::ExportError;
use empresa_db_query::{QueryError, SourceError};
use empresa_db_session::SessionError;
use thiserror::Error;

/// API error type that wraps errors from child crates
#[derive(Error, Debug)]
pub enum ApiError {
    /// Compilation and option loading errors
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Session, pagination, and detail errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Data source errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Input rejected by the API layer itself
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ApiError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    /// HTTP status code for error (useful for an HTTP embedding layer)
    ///
    /// NOTE: this crate has no server layer; the mapping is for consumers
    /// that wrap the registry in a web front end.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) | ApiError::Config(_) => 400,
            ApiError::Query(QueryError::Validation(_))
            | ApiError::Query(QueryError::UnknownDimension(_))
            | ApiError::Query(QueryError::InvalidGraph(_)) => 400,
            ApiError::Session(SessionError::PageOutOfRange { .. })
            | ApiError::Session(SessionError::InvalidPageSize(_))
            | ApiError::Session(SessionError::NoResult) => 400,
            ApiError::Session(SessionError::NotFound(_)) => 404,
            ApiError::Source(SourceError::Timeout { .. })
            | ApiError::Session(SessionError::Source(SourceError::Timeout { .. }))
            | ApiError::Query(QueryError::Source(SourceError::Timeout { .. })) => 504,
            ApiError::Source(_)
            | ApiError::Session(SessionError::Source(_))
            | ApiError::Query(QueryError::Source(_)) => 502,
            ApiError::Export(_) => 500,
        }
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
