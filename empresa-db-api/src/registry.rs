//! High-level registry search facade.
//!
//! Composes the dimension graph, the timeout-bounded data source, the option
//! cache, and the per-interaction result session into the operations the
//! presentation layer calls: load filter options, search, look up by
//! identifier, export.

use crate::catalog;
use crate::config::WarehouseConfig;
use crate::error::{ApiError, Result};
use crate::export::Exporter;
use empresa_db_query::{
    compile_identifier, compile_selection, CachedOptions, DataSource, DimensionGraph,
    FilterSelection, OptionKey, SimpleOptionCache,
};
use empresa_db_query::options::Options;
use empresa_db_query::TimeoutSource;
use empresa_db_session::{ResultSession, SessionError};
use std::sync::Arc;
use tracing::debug;

/// Per-search behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// An all-empty selection compiles to "match every record", which is
    /// expensive; callers must confirm it explicitly.
    pub allow_unconstrained: bool,
    /// Short-circuit when the predicate matches the session's stored
    /// signature instead of re-querying. Off by default: a search is an
    /// explicit user action.
    pub cached_replay: bool,
}

/// The registry engine: one instance per process, shared across sessions.
pub struct Registry<S: DataSource> {
    graph: DimensionGraph,
    results_table: String,
    identifier_column: String,
    source: Arc<TimeoutSource<S>>,
    options: CachedOptions<TimeoutSource<S>, SimpleOptionCache>,
}

impl<S: DataSource> Registry<S> {
    /// Create a registry over an arbitrary dimension graph.
    pub fn new(
        graph: DimensionGraph,
        results_table: impl Into<String>,
        identifier_column: impl Into<String>,
        source: S,
        config: &WarehouseConfig,
    ) -> Self {
        let source = Arc::new(TimeoutSource::new(source, config.query_timeout_ms));
        let options = CachedOptions::new(
            source.clone(),
            SimpleOptionCache::new(config.option_cache_entries),
        );
        Self {
            graph,
            results_table: results_table.into(),
            identifier_column: identifier_column.into(),
            source,
            options,
        }
    }

    /// Create a registry over the company catalog (activity, state,
    /// municipality; CNPJ lookup).
    pub fn company(source: S, config: &WarehouseConfig) -> Self {
        Self::new(
            catalog::company_dimensions(),
            catalog::RESULTS_TABLE,
            catalog::IDENTIFIER_COLUMN,
            source,
            config,
        )
    }

    /// The dimension graph (needed by callers mutating selections).
    pub fn graph(&self) -> &DimensionGraph {
        &self.graph
    }

    /// The ordered option list for a dimension under the current selection.
    ///
    /// A dependent dimension with no parent selection yields an empty list
    /// without touching the source.
    pub async fn options(&self, dimension: &str, selection: &FilterSelection) -> Result<Options> {
        let dim = self.graph.require(dimension)?;
        Ok(self.options.get(dim, selection).await?)
    }

    /// Drop the cached option list for one dimension/parent combination.
    pub fn invalidate_options(&self, dimension: &str, parent_values: &[String]) -> Result<()> {
        let dim = self.graph.require(dimension)?;
        let key = if dim.is_dependent() {
            OptionKey::dependent(&dim.name, parent_values)
        } else {
            OptionKey::independent(&dim.name)
        };
        self.options.invalidate(&key);
        Ok(())
    }

    /// Drop every cached option list.
    pub fn clear_options(&self) {
        self.options.clear();
    }

    /// Compile `selection` and execute it into `session`.
    ///
    /// Returns the record count. Unconstrained searches are rejected unless
    /// `opts.allow_unconstrained` confirms them.
    pub async fn search(
        &self,
        session: &mut ResultSession,
        selection: &FilterSelection,
        opts: SearchOptions,
    ) -> Result<usize> {
        let predicate = compile_selection(&self.graph, &self.results_table, selection);
        if predicate.is_unconstrained() && !opts.allow_unconstrained {
            debug!("rejected unconfirmed unconstrained search");
            return Err(ApiError::validation(
                "unconstrained search requires explicit confirmation",
            ));
        }
        let count = if opts.cached_replay {
            session.replay(&predicate, self.source.as_ref()).await?
        } else {
            session.execute(&predicate, self.source.as_ref()).await?
        };
        Ok(count)
    }

    /// Execute an exact identifier lookup into `session`.
    ///
    /// The identifier is normalized (formatting characters stripped) before
    /// binding; a blank identifier is rejected before any source call.
    pub async fn lookup(&self, session: &mut ResultSession, identifier: &str) -> Result<usize> {
        let predicate =
            compile_identifier(&self.results_table, &self.identifier_column, identifier)?;
        Ok(session.execute(&predicate, self.source.as_ref()).await?)
    }

    /// Export the session's full, unpaginated result table.
    pub fn export(&self, session: &ResultSession, exporter: &dyn Exporter) -> Result<Vec<u8>> {
        let table = session
            .table()
            .ok_or(ApiError::Session(SessionError::NoResult))?;
        Ok(exporter.export(table)?)
    }
}
