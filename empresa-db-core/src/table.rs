//! Row-oriented result tables with stable record identity.
//!
//! A `Table` is the materialized result of one warehouse query: named,
//! ordered columns plus rows in source return order. Each row keeps its
//! zero-based original position as a `RecordId`, so a record selected from a
//! sliced or column-reduced view can always be resolved back to the full row.

use crate::error::{CoreError, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Stable identity of a row: its zero-based position in the original table.
///
/// Survives view-level slicing and column reduction; does NOT survive a table
/// replacement (a new search invalidates all previously handed-out ids).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub usize);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Schema for a result table: ordered column names with O(1) name lookup.
#[derive(Debug, Clone)]
pub struct TableSchema {
    columns: Arc<[String]>,
    name_to_index: HashMap<String, usize>,
}

impl TableSchema {
    /// Create a schema from ordered column names.
    ///
    /// Duplicate column names are a schema error; the warehouse never returns
    /// them and downstream name lookups would be ambiguous.
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut name_to_index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if name_to_index.insert(name.clone(), i).is_some() {
                return Err(CoreError::schema(format!("duplicate column '{}'", name)));
            }
        }
        Ok(Self {
            columns: Arc::from(columns.into_boxed_slice()),
            name_to_index,
        })
    }

    /// Ordered column names.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Column index by name.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

/// One result row: ordered cells matching the table schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row(Vec<Value>);

impl Row {
    /// Create a row from ordered cell values.
    pub fn new(cells: Vec<Value>) -> Self {
        Row(cells)
    }

    /// Cell by column index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// All cells in column order.
    #[inline]
    pub fn cells(&self) -> &[Value] {
        &self.0
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Value> for Row {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Row(iter.into_iter().collect())
    }
}

/// A materialized query result: schema plus rows in source return order.
#[derive(Debug, Clone)]
pub struct Table {
    schema: TableSchema,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given schema.
    pub fn empty(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Create a table from a schema and rows.
    ///
    /// Every row must match the schema width.
    pub fn new(schema: TableSchema, rows: Vec<Row>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != schema.width() {
                return Err(CoreError::schema(format!(
                    "row {} has {} cells, schema has {} columns",
                    i,
                    row.len(),
                    schema.width()
                )));
            }
        }
        Ok(Self { schema, rows })
    }

    /// Append a row, validating its width.
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.schema.width() {
            return Err(CoreError::schema(format!(
                "row has {} cells, schema has {} columns",
                row.len(),
                self.schema.width()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// The table schema.
    #[inline]
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row by stable record id.
    #[inline]
    pub fn get(&self, id: RecordId) -> Option<&Row> {
        self.rows.get(id.0)
    }

    /// Cell by record id and column name.
    pub fn cell(&self, id: RecordId, column: &str) -> Option<&Value> {
        let col = self.schema.index_of(column)?;
        self.get(id)?.get(col)
    }

    /// Iterate rows with their stable record ids.
    pub fn records(&self) -> impl Iterator<Item = (RecordId, &Row)> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| (RecordId(i), row))
    }

    /// Column-reduced copy keeping only the named columns, in the given order.
    ///
    /// Record ids are PRESERVED: row `i` of the projection is row `i` of the
    /// original, so ids selected from a projected view resolve against the
    /// full table. Unknown columns are a schema error.
    pub fn project(&self, columns: &[&str]) -> Result<Table> {
        let mut indices = Vec::with_capacity(columns.len());
        for name in columns {
            match self.schema.index_of(name) {
                Some(i) => indices.push(i),
                None => return Err(CoreError::schema(format!("unknown column '{}'", name))),
            }
        }
        let schema = TableSchema::new(columns.iter().copied())?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row.cells()[i].clone()).collect())
            .collect();
        Ok(Table { schema, rows })
    }
}
