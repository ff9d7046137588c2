//! Per-interaction result session state machine.
//!
//! A session associates one executed predicate with exactly one result table
//! plus the derived view state: the current page and the selected record.
//! The three move together — a successful search replaces them atomically,
//! a failed search touches none of them. Sessions are single-writer by
//! construction (`&mut self`); no further locking is needed.

use crate::detail;
use crate::error::{Result, SessionError};
use crate::page::{self, Page};
use empresa_db_core::{RecordId, Row, Table};
use empresa_db_query::{DataSource, QueryPredicate};
use tracing::{debug, info};

/// The stored outcome of one executed search.
#[derive(Debug)]
struct SearchResult {
    table: Table,
    signature: String,
}

/// Holds the last executed result set and its view state.
///
/// Event entry points mirror the UI interactions: `execute` (search
/// submitted), `set_page` (page changed), `select` / `clear_selection`
/// (record chosen or dismissed). Each is a plain state transition,
/// testable without any rendering.
#[derive(Debug, Default)]
pub struct ResultSession {
    result: Option<SearchResult>,
    current_page: usize,
    selected: Option<RecordId>,
}

impl ResultSession {
    /// Create an empty session: no result, no selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute `predicate` against `source` and store the result.
    ///
    /// On success the table, current page (reset to 1), selection (cleared),
    /// and predicate signature are replaced together; the record count is
    /// returned. On error the session keeps its previous state untouched, so
    /// a failed search is never rendered as "no matching records".
    ///
    /// Always re-queries, even for the signature already stored — a search
    /// is an explicit user action. Use [`replay`](Self::replay) for
    /// cached re-rendering.
    pub async fn execute<S: DataSource>(
        &mut self,
        predicate: &QueryPredicate,
        source: &S,
    ) -> Result<usize> {
        let signature = predicate.signature();
        let table = source.execute(predicate).await?;
        let count = table.len();
        info!(signature = %signature, rows = count, "search executed");

        self.result = Some(SearchResult { table, signature });
        self.current_page = 1;
        self.selected = None;
        Ok(count)
    }

    /// Like [`execute`](Self::execute), but short-circuits when `predicate`
    /// has the signature of the stored result, keeping the current page and
    /// selection instead of re-querying.
    pub async fn replay<S: DataSource>(
        &mut self,
        predicate: &QueryPredicate,
        source: &S,
    ) -> Result<usize> {
        if let Some(result) = &self.result {
            if result.signature == predicate.signature() {
                debug!(signature = %result.signature, "replayed cached result");
                return Ok(result.table.len());
            }
        }
        self.execute(predicate, source).await
    }

    /// The current result table.
    pub fn table(&self) -> Option<&Table> {
        self.result.as_ref().map(|r| &r.table)
    }

    /// Signature of the predicate that produced the current table.
    pub fn signature(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.signature.as_str())
    }

    /// Rows in the current table, if any search has run.
    pub fn record_count(&self) -> Option<usize> {
        self.result.as_ref().map(|r| r.table.len())
    }

    /// The current 1-based page number.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// The currently selected record id, if any.
    pub fn selected(&self) -> Option<RecordId> {
        self.selected
    }

    /// The current page view at `page_size`. Pure given current state.
    pub fn page(&self, page_size: usize) -> Result<Page> {
        let result = self.result.as_ref().ok_or(SessionError::NoResult)?;
        page::slice(&result.table, self.current_page, page_size)
    }

    /// Change the current page, validating against the current table.
    pub fn set_page(&mut self, page: usize, page_size: usize) -> Result<()> {
        let result = self.result.as_ref().ok_or(SessionError::NoResult)?;
        // Validate by slicing; only commit the page number if valid.
        page::slice(&result.table, page, page_size)?;
        self.current_page = page;
        Ok(())
    }

    /// Select a record and return its full row.
    ///
    /// A stale id (the table was replaced since the id was handed out)
    /// clears the selection and reports `NotFound` — recoverable, the caller
    /// renders "no selection" rather than failing.
    pub fn select(&mut self, id: RecordId) -> Result<&Row> {
        let exists = match &self.result {
            Some(result) => result.table.get(id).is_some(),
            None => return Err(SessionError::NoResult),
        };
        if !exists {
            self.selected = None;
            return Err(SessionError::NotFound(id));
        }
        self.selected = Some(id);
        let table = &self.result.as_ref().expect("checked above").table;
        detail::resolve(table, id)
    }

    /// The full row of the current selection, if one is set.
    ///
    /// Always resolves: the selection invariant guarantees a set id exists
    /// in the current table.
    pub fn selected_row(&self) -> Option<&Row> {
        let id = self.selected?;
        self.table().and_then(|t| t.get(id))
    }

    /// Drop the selection pointer.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}
