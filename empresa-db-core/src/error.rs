//! Error types for the core result model.

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors from table construction and access.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Schema or structural error (column count mismatch, unknown column, etc.)
    #[error("Schema error: {0}")]
    Schema(String),

    /// A referenced record no longer exists in the table
    #[error("Record not found: {0}")]
    RecordNotFound(usize),
}

impl CoreError {
    /// Create a schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        CoreError::Schema(msg.into())
    }
}
