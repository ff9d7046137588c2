//! Data source capability.
//!
//! The engine never talks to the warehouse directly; it submits compiled,
//! parameter-bound predicates through this trait and receives materialized
//! tables back. Implementations own connectivity, wire formats, and the
//! store's own execution — all opaque to the core.

use crate::dimension::FilterDimension;
use crate::predicate::QueryPredicate;
use async_trait::async_trait;
use empresa_db_core::Table;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors from the external data source.
///
/// These are failure states, distinct from an empty result: a source error
/// must surface as "search failed" and never render as "no matching records".
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    /// Connectivity failure (network, authentication, session)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The call exceeded the configured deadline
    #[error("Source call timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// The source returned a response the engine could not interpret
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        SourceError::Connection(msg.into())
    }

    /// Create a malformed-response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        SourceError::Malformed(msg.into())
    }
}

/// One entry of a filter option list: the bound value plus a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    /// Value bound into predicates when this option is selected.
    pub value: String,
    /// Label shown in filter controls.
    pub label: String,
}

impl OptionValue {
    /// Option whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Capability of an external columnar store.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Execute a compiled predicate and return the materialized result.
    async fn execute(&self, predicate: &QueryPredicate) -> Result<Table, SourceError>;

    /// Fetch the distinct option values of a dimension, ordered by the
    /// dimension's source column.
    ///
    /// For a dependent dimension, `parent_values` constrains the option
    /// query; for an independent dimension it is empty and ignored.
    async fn fetch_distinct(
        &self,
        dimension: &FilterDimension,
        parent_values: &[String],
    ) -> Result<Vec<OptionValue>, SourceError>;
}

/// Deadline decorator for data sources.
///
/// A slow or hung external call must surface as an error, not stall the
/// session indefinitely. Both operations share one configured deadline.
pub struct TimeoutSource<S> {
    inner: S,
    timeout_ms: u64,
}

impl<S> TimeoutSource<S> {
    /// Wrap `inner`, bounding every call to `timeout_ms` milliseconds.
    pub fn new(inner: S, timeout_ms: u64) -> Self {
        Self { inner, timeout_ms }
    }

    /// The configured deadline in milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    async fn bounded<T, F>(&self, what: &str, fut: F) -> Result<T, SourceError>
    where
        F: std::future::Future<Output = Result<T, SourceError>> + Send,
    {
        let deadline = std::time::Duration::from_millis(self.timeout_ms);
        match tokio::time::timeout(deadline, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(what, timeout_ms = self.timeout_ms, "source call timed out");
                Err(SourceError::Timeout {
                    elapsed_ms: self.timeout_ms,
                })
            }
        }
    }
}

#[async_trait]
impl<S: DataSource> DataSource for TimeoutSource<S> {
    async fn execute(&self, predicate: &QueryPredicate) -> Result<Table, SourceError> {
        self.bounded("execute", self.inner.execute(predicate)).await
    }

    async fn fetch_distinct(
        &self,
        dimension: &FilterDimension,
        parent_values: &[String],
    ) -> Result<Vec<OptionValue>, SourceError> {
        self.bounded(
            "fetch_distinct",
            self.inner.fetch_distinct(dimension, parent_values),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use empresa_db_core::TableSchema;

    /// Source that sleeps before answering.
    struct SlowSource {
        delay_ms: u64,
    }

    #[async_trait]
    impl DataSource for SlowSource {
        async fn execute(&self, _predicate: &QueryPredicate) -> Result<Table, SourceError> {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
            Ok(Table::empty(TableSchema::new(["CNPJ"]).unwrap()))
        }

        async fn fetch_distinct(
            &self,
            _dimension: &FilterDimension,
            _parent_values: &[String],
        ) -> Result<Vec<OptionValue>, SourceError> {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn timeout_converts_to_source_error() {
        let source = TimeoutSource::new(SlowSource { delay_ms: 200 }, 10);
        let predicate = QueryPredicate::new("TB_MVP_CONS", Vec::new());
        let err = source.execute(&predicate).await;
        assert!(matches!(err, Err(SourceError::Timeout { elapsed_ms: 10 })));
    }

    #[tokio::test]
    async fn fast_call_passes_through() {
        let source = TimeoutSource::new(SlowSource { delay_ms: 0 }, 1_000);
        let predicate = QueryPredicate::new("TB_MVP_CONS", Vec::new());
        assert!(source.execute(&predicate).await.is_ok());
    }
}
