//! # Company Registry API
//!
//! High-level API for the company registry search engine, providing unified
//! access to filter options, predicate compilation, result sessions, and
//! export.
//!
//! This crate composes the lower-level crates:
//! - `empresa-db-core` - Result tables and record identity
//! - `empresa-db-query` - Dimensions, predicates, option caching
//! - `empresa-db-session` - Result sessions, pagination, detail resolution
//!
//! ## Quick Start
//!
//! ```ignore
//! use empresa_db_api::{Registry, SearchOptions, WarehouseConfig};
//! use empresa_db_query::FilterSelection;
//! use empresa_db_session::ResultSession;
//!
//! let config = WarehouseConfig::from_env()?;
//! let registry = Registry::company(warehouse_source, &config);
//!
//! // Render filter controls
//! let ufs = registry.options("uf", &selection).await?;
//!
//! // Search and page
//! let mut session = ResultSession::new();
//! let mut selection = FilterSelection::new();
//! selection.set(registry.graph(), "uf", ["SP"]);
//! registry.search(&mut session, &selection, SearchOptions::default()).await?;
//! let page = session.page(50)?;
//!
//! // Inspect and export
//! let row = session.select(page.records()[0].id)?;
//! let csv = registry.export(&session, &DelimitedExporter::csv())?;
//! ```

pub mod catalog;
pub mod config;
mod error;
pub mod export;
mod registry;

pub use config::{ConfigValue, WarehouseConfig, DEFAULT_OPTION_CACHE_ENTRIES, DEFAULT_QUERY_TIMEOUT_MS};
pub use error::{ApiError, Result};
pub use export::{DelimitedExporter, ExportError, Exporter};
pub use registry::{Registry, SearchOptions};
