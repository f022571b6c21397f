//! Typed values and result column metadata

use serde::{Deserialize, Serialize};
use std::fmt;

/// A database value after type coercion
///
/// Backends deliver every column as text; coercion turns columns with a
/// numeric declared type into `Int` or `Float` and leaves the rest alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// A declared result column: output name plus database type name,
/// in declaration order, as reported by the result metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub type_name: String,
}

impl Column {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Coercion kind for this column's declared type, if any.
    pub fn coercion_kind(&self) -> Option<CoercionKind> {
        coercion_kind(&self.type_name)
    }
}

/// Output kind a column type coerces to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionKind {
    Integer,
    Float,
}

/// Map a database type name to its coercion kind.
///
/// Unknown type names return `None` and the column passes through as text.
pub fn coercion_kind(type_name: &str) -> Option<CoercionKind> {
    match type_name.to_ascii_lowercase().as_str() {
        "int" | "int2" | "int4" | "int8" | "serial4" | "serial8" | "smallint" | "bigint"
        | "bigserial" | "serial" => Some(CoercionKind::Integer),
        "numeric" | "decimal" | "real" | "float" | "float4" | "float8" => {
            Some(CoercionKind::Float)
        }
        _ => None,
    }
}
