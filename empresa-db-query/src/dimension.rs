//! Filter dimensions and their dependency graph.
//!
//! A dimension is a filterable attribute with an enumerable value domain.
//! Independent dimensions load their options from a fixed source query;
//! dependent dimensions declare a parent link and load options constrained
//! by the parent's current selection (state → municipality).

use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};

/// Link from a dependent dimension to its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLink {
    /// Name of the parent dimension.
    pub dimension: String,
    /// Column in this dimension's option source table holding parent values.
    pub column: String,
}

/// One filterable attribute of a registry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDimension {
    /// Dimension name, unique within a graph.
    pub name: String,
    /// Column this dimension constrains in the results table.
    pub result_column: String,
    /// Table the option list is loaded from.
    pub source_table: String,
    /// Column the option list is loaded from; also the option sort column.
    pub source_column: String,
    /// Parent link; present only for dependent dimensions.
    pub parent: Option<ParentLink>,
}

impl FilterDimension {
    /// Create an independent dimension.
    pub fn independent(
        name: impl Into<String>,
        result_column: impl Into<String>,
        source_table: impl Into<String>,
        source_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            result_column: result_column.into(),
            source_table: source_table.into(),
            source_column: source_column.into(),
            parent: None,
        }
    }

    /// Create a dependent dimension constrained by `parent_dimension`.
    pub fn dependent(
        name: impl Into<String>,
        result_column: impl Into<String>,
        source_table: impl Into<String>,
        source_column: impl Into<String>,
        parent_dimension: impl Into<String>,
        parent_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            result_column: result_column.into(),
            source_table: source_table.into(),
            source_column: source_column.into(),
            parent: Some(ParentLink {
                dimension: parent_dimension.into(),
                column: parent_column.into(),
            }),
        }
    }

    /// Whether this dimension depends on another dimension's selection.
    #[inline]
    pub fn is_dependent(&self) -> bool {
        self.parent.is_some()
    }
}

/// Ordered collection of dimensions with validated parent links.
///
/// Declaration order is significant: it fixes the clause order of compiled
/// predicates and the recomputation order of dependent selections. Parents
/// must be declared before their dependents, which rules out cycles by
/// construction.
#[derive(Debug, Clone)]
pub struct DimensionGraph {
    dimensions: Vec<FilterDimension>,
}

impl DimensionGraph {
    /// Build a graph, validating names and parent links.
    pub fn new(dimensions: Vec<FilterDimension>) -> Result<Self> {
        let mut seen: Vec<&str> = Vec::with_capacity(dimensions.len());
        for dim in &dimensions {
            if seen.contains(&dim.name.as_str()) {
                return Err(QueryError::invalid_graph(format!(
                    "duplicate dimension '{}'",
                    dim.name
                )));
            }
            if let Some(parent) = &dim.parent {
                if !seen.contains(&parent.dimension.as_str()) {
                    return Err(QueryError::invalid_graph(format!(
                        "dimension '{}' depends on '{}', which is not declared before it",
                        dim.name, parent.dimension
                    )));
                }
            }
            seen.push(&dim.name);
        }
        Ok(Self { dimensions })
    }

    /// Dimensions in declaration order.
    #[inline]
    pub fn dimensions(&self) -> &[FilterDimension] {
        &self.dimensions
    }

    /// Dimension by name.
    pub fn get(&self, name: &str) -> Option<&FilterDimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Dimension by name, or an `UnknownDimension` error.
    pub fn require(&self, name: &str) -> Result<&FilterDimension> {
        self.get(name)
            .ok_or_else(|| QueryError::UnknownDimension(name.to_string()))
    }

    /// Names of all transitive dependents of `name`, in declaration order.
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for dim in &self.dimensions {
            if let Some(parent) = &dim.parent {
                if parent.dimension == name || out.contains(&parent.dimension.as_str()) {
                    out.push(&dim.name);
                }
            }
        }
        out
    }
}
