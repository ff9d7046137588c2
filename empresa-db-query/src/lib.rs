//! Filter dimensions, predicate compilation, and option caching.
//!
//! This crate turns user filter selections into safe, parameterized query
//! predicates and maintains the cached, dependency-aware option lists that
//! drive the filter controls.
//!
//! # Design
//!
//! - **Dependency-aware dimensions**: each filter dimension declares its
//!   option source and an optional parent dimension; dependent option sets
//!   are parameterized by the parent's current selection
//! - **Bound parameters only**: compiled predicates carry placeholder-only
//!   query text plus an ordered parameter list — user values never appear in
//!   generated text
//! - **Single-flight option cache**: concurrent first fetches for the same
//!   key share one underlying source call

pub mod compile;
pub mod dimension;
pub mod error;
pub mod options;
pub mod predicate;
pub mod selection;
pub mod source;

pub use compile::{compile_identifier, compile_selection, normalize_identifier};
pub use dimension::{DimensionGraph, FilterDimension, ParentLink};
pub use error::{QueryError, Result};
pub use options::{CachedOptions, NoCache, OptionCache, OptionKey, SimpleOptionCache};
pub use predicate::{Clause, OrderBy, QueryPredicate};
pub use selection::FilterSelection;
pub use source::{DataSource, OptionValue, SourceError, TimeoutSource};
