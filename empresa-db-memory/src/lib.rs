//! In-memory data source for tests, demos, and reference semantics.
//!
//! `MemorySource` evaluates compiled predicates STRUCTURALLY against seeded
//! tables — it never renders or parses query text. That makes it both a fast
//! test double and the executable definition of what a predicate means:
//! membership clauses OR within a column, clauses AND across columns,
//! explicit `OrderBy` sorts, everything else preserves seed order.

pub mod store;

pub use store::MemorySource;
