//! Error types for predicate compilation and option loading.

use crate::source::SourceError;
use thiserror::Error;

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors from compilation and option loading.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Input rejected before reaching the data source
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown filter dimension
    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    /// Dimension graph construction error
    #[error("Invalid dimension graph: {0}")]
    InvalidGraph(String),

    /// Error from the external data source
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

impl QueryError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        QueryError::Validation(msg.into())
    }

    /// Create an invalid-graph error
    pub fn invalid_graph(msg: impl Into<String>) -> Self {
        QueryError::InvalidGraph(msg.into())
    }
}
