//! Detail resolution: from a stable record id back to the full record.
//!
//! Resolution works over `RecordId` — the row's original position — never
//! over a view's row ordinal, so a record chosen from page 2 of a
//! column-reduced view still yields the full, un-truncated row.

use crate::error::{Result, SessionError};
use empresa_db_core::{RecordId, Row, Table, Value};

/// Resolve a record id to its full row in `table`.
///
/// `NotFound` when the id does not exist (typically because the table was
/// replaced since the id was handed out); callers recover by clearing their
/// selection.
pub fn resolve(table: &Table, id: RecordId) -> Result<&Row> {
    table.get(id).ok_or(SessionError::NotFound(id))
}

/// Resolve a record id to ordered `(column, value)` pairs for a detail view.
///
/// Covers every column of the full table regardless of which reduced view
/// the id was selected from.
pub fn resolve_detail(table: &Table, id: RecordId) -> Result<Vec<(String, Value)>> {
    let row = resolve(table, id)?;
    Ok(table
        .schema()
        .columns()
        .iter()
        .zip(row.cells())
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page;
    use empresa_db_core::TableSchema;

    fn table() -> Table {
        let schema = TableSchema::new(["CNPJ", "RAZAO_SOCIAL", "UF", "MUNICIPIO"]).unwrap();
        let rows = (0..120)
            .map(|i| {
                Row::new(vec![
                    Value::String(format!("{:014}", i)),
                    Value::String(format!("Empresa {}", i)),
                    "SP".into(),
                    "Campinas".into(),
                ])
            })
            .collect();
        Table::new(schema, rows).unwrap()
    }

    #[test]
    fn resolve_returns_full_row() {
        let t = table();
        let row = resolve(&t, RecordId(73)).unwrap();
        assert_eq!(row.len(), 4);
        assert_eq!(row.get(1), Some(&Value::String("Empresa 73".into())));
    }

    #[test]
    fn missing_id_is_not_found() {
        let t = table();
        assert!(matches!(
            resolve(&t, RecordId(120)),
            Err(SessionError::NotFound(RecordId(120)))
        ));
    }

    #[test]
    fn id_from_reduced_view_resolves_full_record() {
        let t = table();
        // The UI lists a reduced view of page 2.
        let view = t.project(&["CNPJ", "UF"]).unwrap();
        let page = page::slice(&view, 2, 50).unwrap();
        let chosen = page.records()[3].id;
        assert_eq!(chosen, RecordId(53));

        // Detail resolution against the FULL table yields every column.
        let detail = resolve_detail(&t, chosen).unwrap();
        assert_eq!(detail.len(), 4);
        assert_eq!(detail[1].0, "RAZAO_SOCIAL");
        assert_eq!(detail[1].1, Value::String("Empresa 53".into()));
    }
}
