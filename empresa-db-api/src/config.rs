//! Warehouse connection configuration.
//!
//! Connection settings resolve from environment variables with optional
//! defaults, so deployments configure the warehouse without code changes and
//! tests run with explicit values. Credentials are never logged.

use crate::error::{ApiError, Result};

/// Default deadline for one data source call.
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 30_000;

/// Default bound on cached option lists.
pub const DEFAULT_OPTION_CACHE_ENTRIES: usize = 256;

/// A leaf configuration value resolvable from an environment variable with
/// an optional default.
#[derive(Debug, Clone, Default)]
pub struct ConfigValue {
    pub env_var: Option<String>,
    pub default_val: Option<String>,
}

impl ConfigValue {
    /// Value backed by an environment variable only.
    pub fn env(var: impl Into<String>) -> Self {
        Self {
            env_var: Some(var.into()),
            default_val: None,
        }
    }

    /// Value backed by an environment variable with a fallback default.
    pub fn env_or(var: impl Into<String>, default_val: impl Into<String>) -> Self {
        Self {
            env_var: Some(var.into()),
            default_val: Some(default_val.into()),
        }
    }

    /// Resolve to a string, preferring a non-empty environment variable.
    pub fn resolve_string(&self) -> Option<String> {
        if let Some(var) = &self.env_var {
            if let Ok(val) = std::env::var(var) {
                if !val.is_empty() {
                    return Some(val);
                }
            }
        }
        self.default_val.clone()
    }
}

/// Connection settings for the external warehouse.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub account: String,
    pub user: String,
    pub password: String,
    pub warehouse: String,
    pub database: String,
    pub schema: String,
    /// Deadline applied to every data source call.
    pub query_timeout_ms: u64,
    /// Bound on cached option lists.
    pub option_cache_entries: usize,
}

impl WarehouseConfig {
    /// Resolve the configuration from `EMPRESA_DB_*` environment variables.
    ///
    /// Connection fields are required; timeout and cache bound fall back to
    /// defaults when unset or unparseable values are absent.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            account: require("EMPRESA_DB_ACCOUNT")?,
            user: require("EMPRESA_DB_USER")?,
            password: require("EMPRESA_DB_PASSWORD")?,
            warehouse: require("EMPRESA_DB_WAREHOUSE")?,
            database: require("EMPRESA_DB_DATABASE")?,
            schema: require("EMPRESA_DB_SCHEMA")?,
            query_timeout_ms: parse_or(
                ConfigValue::env("EMPRESA_DB_QUERY_TIMEOUT_MS"),
                DEFAULT_QUERY_TIMEOUT_MS,
            )?,
            option_cache_entries: parse_or(
                ConfigValue::env("EMPRESA_DB_OPTION_CACHE_ENTRIES"),
                DEFAULT_OPTION_CACHE_ENTRIES,
            )?,
        })
    }

    /// In-process configuration with default timeout and cache bound, for
    /// embedding a non-warehouse source (tests, demos).
    pub fn in_process() -> Self {
        Self {
            account: String::new(),
            user: String::new(),
            password: String::new(),
            warehouse: String::new(),
            database: String::new(),
            schema: String::new(),
            query_timeout_ms: DEFAULT_QUERY_TIMEOUT_MS,
            option_cache_entries: DEFAULT_OPTION_CACHE_ENTRIES,
        }
    }
}

fn require(var: &str) -> Result<String> {
    ConfigValue::env(var)
        .resolve_string()
        .ok_or_else(|| ApiError::config(format!("missing required setting {}", var)))
}

fn parse_or<T: std::str::FromStr>(value: ConfigValue, default_val: T) -> Result<T> {
    match value.resolve_string() {
        None => Ok(default_val),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::config(format!("unparseable numeric setting '{}'", raw))),
    }
}
