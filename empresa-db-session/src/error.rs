//! Error types for session operations.

use empresa_db_core::RecordId;
use empresa_db_query::SourceError;
use thiserror::Error;

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors from session, pagination, and detail operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Requested page is outside `[1, max(page_count, 1)]`
    #[error("Page {page} out of range (1..={max_page})")]
    PageOutOfRange { page: usize, max_page: usize },

    /// Page size must be at least 1
    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    /// The referenced record no longer exists in the current table
    #[error("Record {0} not found in current result")]
    NotFound(RecordId),

    /// No search has produced a result yet
    #[error("No result loaded")]
    NoResult,

    /// The search itself failed; the previous result is retained
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}
