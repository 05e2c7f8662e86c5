// File: crates/chart-core/src/dataset.rs
// Summary: Tabular dataset model: named columns of scalar values sharing one row count.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Rendering format for temporal cells (display and JSON output).
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Time(NaiveDateTime),
    Null,
}

impl Value {
    /// Numeric view used for plotting positions. Text and nulls have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) if v.is_finite() => Some(*v),
            Value::Time(t) => Some(t.and_utc().timestamp() as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
            Value::Null => Ok(()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(v) if v.is_finite() => serializer.serialize_f64(*v),
            Value::Number(_) | Value::Null => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Time(t) => serializer.collect_str(&t.format(TIME_FORMAT)),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self { Value::Number(v) }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self { Value::Number(v as f64) }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self { Value::Text(v.to_string()) }
}

impl From<String> for Value {
    fn from(v: String) -> Self { Value::Text(v) }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self { Value::Time(v) }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self { name: name.into(), values }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn values(&self) -> &[Value] { &self.values }
    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedColumn { column: String, expected: usize, found: usize },
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

/// Columns in file order. Invariant: every column holds exactly `row_count` values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        for (i, c) in columns.iter().enumerate() {
            if c.len() != row_count {
                return Err(DatasetError::RaggedColumn {
                    column: c.name.clone(),
                    expected: row_count,
                    found: c.len(),
                });
            }
            if columns[..i].iter().any(|prev| prev.name == c.name) {
                return Err(DatasetError::DuplicateColumn(c.name.clone()));
            }
        }
        Ok(Self { columns, row_count })
    }

    /// Convenience constructor from `(name, values)` pairs.
    pub fn from_columns<N, I>(columns: I) -> Result<Self, DatasetError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Vec<Value>)>,
    {
        Self::new(columns.into_iter().map(|(n, v)| Column::new(n, v)).collect())
    }

    /// Exact-name lookup.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool { self.column(name).is_some() }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn columns(&self) -> &[Column] { &self.columns }
    pub fn row_count(&self) -> usize { self.row_count }
    pub fn is_empty(&self) -> bool { self.columns.is_empty() }
}
