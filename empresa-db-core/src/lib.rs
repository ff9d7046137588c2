//! Tabular result model for the company registry engine.
//!
//! This crate provides the row-oriented result types shared by the query,
//! session, and api crates.
//!
//! # Design
//!
//! - **Named, ordered columns**: all column access goes through `TableSchema`,
//!   which is built once and offers O(1) index-by-name lookups
//! - **Stable record identity**: every row keeps its zero-based original
//!   position (`RecordId`) independent of view-level slicing or column
//!   reduction
//! - **Strongly typed cells**: all cell access is through the `Value` enum

pub mod error;
pub mod table;
pub mod value;

pub use error::{CoreError, Result};
pub use table::{RecordId, Row, Table, TableSchema};
pub use value::Value;
