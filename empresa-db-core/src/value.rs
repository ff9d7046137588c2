//! Scalar cell values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value in a result table.
///
/// The warehouse returns loosely typed scalars; this enum covers the types
/// observed in registry result sets. `Null` displays as the empty string so
/// sparse records render cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
}

impl Value {
    /// Whether this value is `Null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// String slice view, if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Compare against a bound string parameter.
    ///
    /// Non-string values compare through their display rendering, matching
    /// how the warehouse coerces typed columns in equality predicates.
    pub fn matches_str(&self, other: &str) -> bool {
        match self {
            Value::Null => false,
            Value::String(s) => s == other,
            v => v.to_string() == other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Long(n) => write!(f, "{}", n),
            Value::Double(d) => write!(f, "{}", d),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
