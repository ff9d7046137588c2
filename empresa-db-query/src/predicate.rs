//! Parameter-bound query predicates.
//!
//! A `QueryPredicate` is the immutable, fully-resolved form of a filter
//! selection or identifier lookup, ready to submit to a data source. It
//! carries the predicate structure AND the bound parameter values, so it can
//! be logged and tested without re-deriving anything from mutable UI state.
//!
//! Generated query text contains `?` placeholders only. Parameter values
//! travel separately, in placeholder order; they are never concatenated into
//! the text, which removes injection as an error class rather than handling
//! it after the fact.

use serde::{Deserialize, Serialize};

/// One conjunct of a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clause {
    /// `column IN (?, ?, ...)` — set membership over bound values.
    MemberOf { column: String, values: Vec<String> },
    /// `column = ?` — single bound equality.
    Equals { column: String, value: String },
}

impl Clause {
    /// The constrained column.
    pub fn column(&self) -> &str {
        match self {
            Clause::MemberOf { column, .. } | Clause::Equals { column, .. } => column,
        }
    }

    /// Bound parameter values in placeholder order.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Clause::MemberOf { values, .. } => values,
            Clause::Equals { value, .. } => std::slice::from_ref(value),
        };
        slice.iter().map(String::as_str)
    }

    fn sql_into(&self, out: &mut String) {
        match self {
            Clause::MemberOf { column, values } => {
                out.push_str(column);
                out.push_str(" IN (");
                for i in 0..values.len() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push('?');
                }
                out.push(')');
            }
            Clause::Equals { column, .. } => {
                out.push_str(column);
                out.push_str(" = ?");
            }
        }
    }
}

/// Explicit result ordering.
///
/// Sorting is a declared property of the predicate, not an incidental
/// behavior of the store: a table's row order is the source return order,
/// which this clause makes deterministic when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    /// Ascending order on `column`.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }
}

/// An immutable, fully-bound filter predicate against one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPredicate {
    table: String,
    clauses: Vec<Clause>,
    order_by: Option<OrderBy>,
}

impl QueryPredicate {
    /// Create a predicate over `table` with AND-ed clauses.
    pub fn new(table: impl Into<String>, clauses: Vec<Clause>) -> Self {
        Self {
            table: table.into(),
            clauses,
            order_by: None,
        }
    }

    /// Attach an explicit ordering.
    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// The queried table.
    #[inline]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The AND-ed clauses.
    #[inline]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// The declared ordering, if any.
    #[inline]
    pub fn order_by(&self) -> Option<&OrderBy> {
        self.order_by.as_ref()
    }

    /// Whether the predicate matches every record (no clauses).
    #[inline]
    pub fn is_unconstrained(&self) -> bool {
        self.clauses.is_empty()
    }

    /// All bound parameter values, in placeholder order.
    pub fn params(&self) -> Vec<&str> {
        self.clauses.iter().flat_map(Clause::params).collect()
    }

    /// Placeholder-only SQL text for this predicate.
    ///
    /// Contains `?` markers where `params()` values bind; never contains a
    /// bound value itself.
    pub fn sql(&self) -> String {
        let mut out = String::from("SELECT * FROM ");
        out.push_str(&self.table);
        for (i, clause) in self.clauses.iter().enumerate() {
            out.push_str(if i == 0 { " WHERE " } else { " AND " });
            clause.sql_into(&mut out);
        }
        if let Some(order) = &self.order_by {
            out.push_str(" ORDER BY ");
            out.push_str(&order.column);
            if !order.ascending {
                out.push_str(" DESC");
            }
        }
        out
    }

    /// JSON rendering of the full predicate (structure plus bound values),
    /// for logs and diagnostics.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("predicate serializes")
    }

    /// Canonical signature identifying this predicate.
    ///
    /// Two predicates with the same table, clauses (in order), bound values,
    /// and ordering share a signature. Used by the result session to detect
    /// replays of the search that produced the current table.
    pub fn signature(&self) -> String {
        let mut sig = String::from(&self.table);
        for clause in &self.clauses {
            sig.push('|');
            sig.push_str(clause.column());
            for param in clause.params() {
                sig.push('=');
                sig.push_str(param);
                sig.push(';');
            }
        }
        if let Some(order) = &self.order_by {
            sig.push('|');
            sig.push('~');
            sig.push_str(&order.column);
            sig.push(if order.ascending { '+' } else { '-' });
        }
        sig
    }
}
