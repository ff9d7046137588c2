//! Deterministic slicing of tables into fixed-size pages.
//!
//! Pages are 1-based. Page `p` of size `n` covers rows
//! `[(p-1)·n, min(p·n, total))` in table order. Each page record carries its
//! stable `RecordId`, so view rows re-identify the same underlying record on
//! every render.

use crate::error::{Result, SessionError};
use empresa_db_core::{RecordId, Row, Table};

/// Number of pages needed for `total_rows` rows at `page_size` per page.
///
/// Zero rows is zero pages.
pub fn page_count(total_rows: usize, page_size: usize) -> usize {
    total_rows.div_ceil(page_size.max(1))
}

/// One row of a page, tagged with its stable record id.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: RecordId,
    pub row: Row,
}

/// A read-only view of one page of a table.
#[derive(Debug, Clone)]
pub struct Page {
    number: usize,
    page_count: usize,
    page_size: usize,
    total_rows: usize,
    columns: Vec<String>,
    records: Vec<PageRecord>,
}

impl Page {
    /// 1-based page number.
    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Total pages at this page size.
    #[inline]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Configured page size.
    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Total rows in the underlying table.
    #[inline]
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Column names of this view.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Records of this page, in table order.
    #[inline]
    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    /// 1-based inclusive display range `(first, last)`; `None` when empty.
    pub fn display_range(&self) -> Option<(usize, usize)> {
        let first = self.records.first()?.id.0 + 1;
        let last = self.records.last()?.id.0 + 1;
        Some((first, last))
    }
}

/// Slice `table` into its 1-based page `page` of size `page_size`.
///
/// A page outside `[1, max(page_count, 1)]` is a validation error; page 1 of
/// an empty table is the empty page. Row order is the table's row order.
pub fn slice(table: &Table, page: usize, page_size: usize) -> Result<Page> {
    if page_size == 0 {
        return Err(SessionError::InvalidPageSize(page_size));
    }
    let total_rows = table.len();
    let count = page_count(total_rows, page_size);
    let max_page = count.max(1);
    if page < 1 || page > max_page {
        return Err(SessionError::PageOutOfRange { page, max_page });
    }

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_rows);
    let records = (start..end)
        .map(|i| PageRecord {
            id: RecordId(i),
            row: table.get(RecordId(i)).expect("row in range").clone(),
        })
        .collect();

    Ok(Page {
        number: page,
        page_count: count,
        page_size,
        total_rows,
        columns: table.schema().columns().to_vec(),
        records,
    })
}
