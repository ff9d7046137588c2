//! The company registry dimension catalog.
//!
//! Names the warehouse tables and columns behind the three filter
//! dimensions and the identifier lookup. The municipality dimension depends
//! on the state dimension: its option list is constrained by the selected
//! states.

use empresa_db_query::{DimensionGraph, FilterDimension};

/// Consolidated results table queried by every search.
pub const RESULTS_TABLE: &str = "TB_MVP_CONS";

/// Exact-lookup identifier column (CNPJ, stored unformatted).
pub const IDENTIFIER_COLUMN: &str = "CNPJ";

/// Economic activity dimension name.
pub const ATIVIDADE: &str = "atividade";

/// State dimension name.
pub const UF: &str = "uf";

/// Municipality dimension name (dependent on state).
pub const MUNICIPIO: &str = "municipio";

/// The registry's dimension graph.
///
/// Declaration order fixes predicate clause order: activity, state,
/// municipality.
pub fn company_dimensions() -> DimensionGraph {
    DimensionGraph::new(vec![
        FilterDimension::independent(ATIVIDADE, "CNAE_DESCR", "TB_CNAE_DESCR", "CODIGO_DESCR"),
        FilterDimension::independent(UF, "UF", "TB_UF_MUNICIPIO", "UF"),
        FilterDimension::dependent(MUNICIPIO, "MUNICIPIO", "TB_UF_MUNICIPIO", "MUNICIPIO", UF, "UF"),
    ])
    .expect("static catalog is well-formed")
}
