//! Engine-neutral parameter and row types.
//!
//! Every statement that passes through the gateway binds its positional
//! parameters as [`Value`]s and receives its records back as [`Row`]s, so
//! callers never touch `rusqlite` or `tokio-postgres` types directly.

use super::error::GatewayError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A single bound parameter or column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer view of the value.
    ///
    /// Reals convert only when integral, text only when it parses.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Null => None,
            Value::Integer(v) => Some(*v),
            Value::Real(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            Value::Real(_) => None,
            Value::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Integer(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
            Value::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Integer(v) => Some(v.to_string()),
            Value::Real(v) => Some(v.to_string()),
            Value::Text(s) => Some(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Real(v) => serializer.serialize_f64(*v),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// One result record, columns in the order the engine reported them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Looks a column up by name.
    ///
    /// PostgreSQL folds unquoted identifiers to lower case while SQLite keeps
    /// them as written, so the comparison ignores ASCII case.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    fn require(&self, column: &str) -> Result<&Value, GatewayError> {
        self.get(column).ok_or_else(|| GatewayError::MissingColumn(column.to_string()))
    }

    pub fn get_i64(&self, column: &str) -> Result<Option<i64>, GatewayError> {
        let value = self.require(column)?;
        match value {
            Value::Null => Ok(None),
            other => other.as_i64().map(Some).ok_or_else(|| GatewayError::InvalidColumn {
                column: column.to_string(),
                expected: "integer",
                found: other.to_string(),
            }),
        }
    }

    pub fn get_f64(&self, column: &str) -> Result<Option<f64>, GatewayError> {
        let value = self.require(column)?;
        match value {
            Value::Null => Ok(None),
            other => other.as_f64().map(Some).ok_or_else(|| GatewayError::InvalidColumn {
                column: column.to_string(),
                expected: "real",
                found: other.to_string(),
            }),
        }
    }

    pub fn get_text(&self, column: &str) -> Result<Option<String>, GatewayError> {
        Ok(self.require(column)?.as_text())
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Normalized outcome of a statement on either engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    /// Matching records for reads, the generated key for inserts that asked
    /// for one, empty otherwise.
    pub rows: Vec<Row>,
    /// Row count for reads, rows changed for writes.
    pub affected: u64,
}

impl QueryResult {
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Key requested through `RETURNING <column>` on an insert.
    pub fn returned_id(&self, column: &str) -> Result<i64, GatewayError> {
        self.first()
            .ok_or(GatewayError::NoRowsReturned)?
            .get_i64(column)?
            .ok_or_else(|| GatewayError::MissingColumn(column.to_string()))
    }
}
