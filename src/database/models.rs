/*!
 * Database models for introspected tables and query results.
 */

use rusqlite::types::ValueRef;
use std::fmt;

/// A single column value returned by a query
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL
    Null,
    /// Integer value
    Integer(i64),
    /// Floating point value
    Real(f64),
    /// Text value
    Text(String),
    /// Binary value
    Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Real(f) => Self::Real(f),
            ValueRef::Text(bytes) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Self::Blob(bytes.to_vec()),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Real(r) => write!(f, "{}", r),
            Self::Text(s) => write!(f, "{}", s.replace(['\r', '\n'], " ")),
            Self::Blob(b) => write!(f, "<blob {} bytes>", b.len()),
        }
    }
}

/// Rows produced by one executed statement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    /// Column names as reported by the prepared statement
    pub columns: Vec<String>,
    /// Row values, each row has `columns.len()` values
    pub rows: Vec<Vec<SqlValue>>,
}

impl QueryResult {
    /// Create a result from column names and rows
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self { columns, rows }
    }

    /// Whether the statement returned no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns, taken from the first row when no names are known
    pub fn column_count(&self) -> usize {
        if !self.columns.is_empty() {
            return self.columns.len();
        }
        self.rows.first().map_or(0, Vec::len)
    }
}

/// A column as reported by `PRAGMA table_info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared type, may be empty in SQLite
    pub data_type: String,
}

/// A table and its columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    /// One-line description used as model context
    pub fn describe(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                if c.data_type.is_empty() {
                    c.name.clone()
                } else {
                    format!("{} ({})", c.name, c.data_type)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!("Table '{}' has columns: {}.", self.name, columns)
    }
}
