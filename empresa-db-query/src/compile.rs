//! Compilation of filter selections and identifier lookups into predicates.

use crate::dimension::DimensionGraph;
use crate::error::{QueryError, Result};
use crate::predicate::{Clause, QueryPredicate};
use crate::selection::FilterSelection;
use tracing::debug;

/// Compile a filter selection into a predicate over `results_table`.
///
/// Each dimension with a non-empty selection contributes one membership
/// clause on its result column; clauses are AND-ed in the graph's declaration
/// order. Dimensions with an empty selection contribute nothing — they are
/// unconstrained, not "match nothing". An all-empty selection therefore
/// compiles to an unconstrained predicate; callers decide whether to gate
/// that behind a confirmation before executing it.
pub fn compile_selection(
    graph: &DimensionGraph,
    results_table: &str,
    selection: &FilterSelection,
) -> QueryPredicate {
    let clauses: Vec<Clause> = graph
        .dimensions()
        .iter()
        .filter_map(|dim| {
            let values = selection.get(&dim.name);
            if values.is_empty() {
                None
            } else {
                Some(Clause::MemberOf {
                    column: dim.result_column.clone(),
                    values: values.to_vec(),
                })
            }
        })
        .collect();
    let predicate = QueryPredicate::new(results_table, clauses);
    debug!(sql = %predicate.sql(), params = predicate.params().len(), "compiled selection");
    predicate
}

/// Strip identifier formatting: keep ASCII alphanumerics, drop everything
/// else (dots, slashes, hyphens, spaces, and any other punctuation).
pub fn normalize_identifier(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Compile an exact identifier lookup into a predicate over `results_table`.
///
/// The input is normalized first; an input that is empty after normalization
/// is a validation error and never reaches the data source.
pub fn compile_identifier(
    results_table: &str,
    column: &str,
    raw: &str,
) -> Result<QueryPredicate> {
    let normalized = normalize_identifier(raw);
    if normalized.is_empty() {
        return Err(QueryError::validation(
            "identifier is empty after normalization",
        ));
    }
    Ok(QueryPredicate::new(
        results_table,
        vec![Clause::Equals {
            column: column.to_string(),
            value: normalized,
        }],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::FilterDimension;

    fn graph() -> DimensionGraph {
        DimensionGraph::new(vec![
            FilterDimension::independent("atividade", "CNAE_DESCR", "TB_CNAE_DESCR", "CODIGO_DESCR"),
            FilterDimension::independent("uf", "UF", "TB_UF_MUNICIPIO", "UF"),
            FilterDimension::dependent(
                "municipio",
                "MUNICIPIO",
                "TB_UF_MUNICIPIO",
                "MUNICIPIO",
                "uf",
                "UF",
            ),
        ])
        .unwrap()
    }

    #[test]
    fn selected_dimensions_become_anded_clauses() {
        let g = graph();
        let mut sel = FilterSelection::new();
        sel.set(&g, "atividade", ["62.01-5"]);
        sel.set(&g, "uf", ["SP"]);

        let predicate = compile_selection(&g, "TB_MVP_CONS", &sel);
        assert_eq!(
            predicate.sql(),
            "SELECT * FROM TB_MVP_CONS WHERE CNAE_DESCR IN (?) AND UF IN (?)"
        );
        assert_eq!(predicate.params(), vec!["62.01-5", "SP"]);
    }

    #[test]
    fn empty_selection_is_unconstrained_never_errors() {
        let g = graph();
        let predicate = compile_selection(&g, "TB_MVP_CONS", &FilterSelection::new());
        assert!(predicate.is_unconstrained());
        assert_eq!(predicate.sql(), "SELECT * FROM TB_MVP_CONS");
    }

    #[test]
    fn identifier_is_normalized_before_binding() {
        let predicate = compile_identifier("TB_MVP_CONS", "CNPJ", "26.909.999/0002-60").unwrap();
        assert_eq!(predicate.params(), vec!["26909999000260"]);
        assert_eq!(predicate.sql(), "SELECT * FROM TB_MVP_CONS WHERE CNPJ = ?");
    }

    #[test]
    fn blank_identifier_is_validation_error() {
        let err = compile_identifier("TB_MVP_CONS", "CNPJ", "   ");
        assert!(matches!(err, Err(QueryError::Validation(_))));
        let err = compile_identifier("TB_MVP_CONS", "CNPJ", "./-");
        assert!(matches!(err, Err(QueryError::Validation(_))));
    }
}
