//! User filter selections.

use crate::dimension::DimensionGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A mapping from dimension name to the ordered selected values.
///
/// Multiple values within a dimension are OR-ed; dimensions combine with AND.
/// An absent or empty entry leaves that dimension unconstrained.
///
/// The map is a `BTreeMap` so iteration order (and therefore predicate
/// signatures) is deterministic regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    values: BTreeMap<String, Vec<String>>,
}

impl FilterSelection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected values for a dimension (empty slice if unconstrained).
    pub fn get(&self, dimension: &str) -> &[String] {
        self.values.get(dimension).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether every dimension is unconstrained.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(Vec::is_empty)
    }

    /// Replace the selection for one dimension, de-duplicating while keeping
    /// first-occurrence order.
    ///
    /// When the dimension has dependents in `graph`, their selections are
    /// cleared: a changed parent invalidates the child option domain, so a
    /// stale child selection must not survive into the next compile.
    pub fn set(
        &mut self,
        graph: &DimensionGraph,
        dimension: &str,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) {
        let mut deduped: Vec<String> = Vec::new();
        for v in values {
            let v = v.into();
            if !deduped.contains(&v) {
                deduped.push(v);
            }
        }
        let changed = self.get(dimension) != deduped.as_slice();
        self.values.insert(dimension.to_string(), deduped);
        if changed {
            for dependent in graph.dependents_of(dimension) {
                self.values.remove(dependent);
            }
        }
    }

    /// Clear one dimension's selection (and, transitively, its dependents').
    pub fn clear(&mut self, graph: &DimensionGraph, dimension: &str) {
        self.set(graph, dimension, Vec::<String>::new());
    }

    /// Iterate `(dimension, values)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
