//! Seeded-table store implementing the data source capability.

use async_trait::async_trait;
use empresa_db_core::{Row, Table};
use empresa_db_query::{
    Clause, DataSource, FilterDimension, OptionValue, QueryPredicate, SourceError,
};
use std::collections::HashMap;
use tracing::debug;

/// An in-memory warehouse: named tables evaluated structurally.
#[derive(Debug, Default)]
pub struct MemorySource {
    tables: HashMap<String, Table>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table under `name`, replacing any existing one.
    pub fn insert_table(&mut self, name: impl Into<String>, table: Table) {
        self.tables.insert(name.into(), table);
    }

    /// Builder-style seeding.
    pub fn with_table(mut self, name: impl Into<String>, table: Table) -> Self {
        self.insert_table(name, table);
        self
    }

    fn table(&self, name: &str) -> Result<&Table, SourceError> {
        self.tables
            .get(name)
            .ok_or_else(|| SourceError::malformed(format!("unknown table '{}'", name)))
    }

    fn column_index(table: &Table, column: &str) -> Result<usize, SourceError> {
        table
            .schema()
            .index_of(column)
            .ok_or_else(|| SourceError::malformed(format!("unknown column '{}'", column)))
    }

    fn row_matches(table: &Table, row: &Row, clauses: &[Clause]) -> Result<bool, SourceError> {
        for clause in clauses {
            let idx = Self::column_index(table, clause.column())?;
            let cell = row.get(idx).expect("row width validated by Table");
            let hit = clause.params().any(|param| cell.matches_str(param));
            if !hit {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn execute(&self, predicate: &QueryPredicate) -> Result<Table, SourceError> {
        let table = self.table(predicate.table())?;

        let mut rows: Vec<Row> = Vec::new();
        for (_, row) in table.records() {
            if Self::row_matches(table, row, predicate.clauses())? {
                rows.push(row.clone());
            }
        }

        if let Some(order) = predicate.order_by() {
            let idx = Self::column_index(table, &order.column)?;
            rows.sort_by(|a, b| {
                let a_cell = a.get(idx).expect("row width validated by Table");
                let b_cell = b.get(idx).expect("row width validated by Table");
                let ord = a_cell.to_string().cmp(&b_cell.to_string());
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }

        debug!(table = predicate.table(), rows = rows.len(), "memory execute");
        Table::new(table.schema().clone(), rows)
            .map_err(|e| SourceError::malformed(e.to_string()))
    }

    async fn fetch_distinct(
        &self,
        dimension: &FilterDimension,
        parent_values: &[String],
    ) -> Result<Vec<OptionValue>, SourceError> {
        let table = self.table(&dimension.source_table)?;
        let value_idx = Self::column_index(table, &dimension.source_column)?;
        let parent_idx = match &dimension.parent {
            Some(parent) if !parent_values.is_empty() => {
                Some(Self::column_index(table, &parent.column)?)
            }
            _ => None,
        };

        let mut values: Vec<String> = Vec::new();
        for (_, row) in table.records() {
            if let Some(idx) = parent_idx {
                let parent_cell = row.get(idx).expect("row width validated");
                if !parent_values.iter().any(|p| parent_cell.matches_str(p)) {
                    continue;
                }
            }
            let cell = row.get(value_idx).expect("row width validated");
            if cell.is_null() {
                continue;
            }
            let value = cell.to_string();
            if !values.contains(&value) {
                values.push(value);
            }
        }
        values.sort();
        Ok(values.into_iter().map(OptionValue::plain).collect())
    }
}
