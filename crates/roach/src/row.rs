//! Result rows with typed, nullable column access.
//!
//! Rows coming back from tokio-postgres are converted eagerly into a
//! column-name → [`Value`] map, so scanning them never touches the wire types
//! again and tests can build rows by hand.

use crate::value::Value;
use indexmap::IndexMap;
use thiserror::Error;
use tokio_postgres::types::Type as PgTypeInfo;

/// A row of data as column name → value pairs, in result order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: IndexMap<String, Value>,
}

/// Reading a column of a [`Row`] as a given type failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("column `{0}` missing from result row")]
    MissingColumn(String),

    #[error("column `{column}` holds a {actual} value, expected {expected}")]
    WrongType {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("column `{column}` of type {pg_type} could not be decoded: {message}")]
    Unreadable {
        column: String,
        pg_type: String,
        message: String,
    },

    #[error("column `{0}` is NULL")]
    UnexpectedNull(String),
}

impl Row {
    /// Build a row from `(column, value)` pairs.
    pub fn new<K, V>(columns: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Convert a tokio_postgres Row to our Row type.
    ///
    /// A column that fails to decode becomes [`Value::Unreadable`] instead of
    /// failing the whole result set; the failure surfaces when it is scanned.
    pub fn from_pg(row: &tokio_postgres::Row) -> Self {
        let columns = row
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, column)| (column.name().to_string(), pg_value(row, idx)))
            .collect();
        Self { columns }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn value(&self, column: &str) -> Result<&Value, ScanError> {
        match self.columns.get(column) {
            Some(Value::Unreadable { pg_type, message }) => Err(ScanError::Unreadable {
                column: column.to_string(),
                pg_type: pg_type.clone(),
                message: message.clone(),
            }),
            Some(value) => Ok(value),
            None => Err(ScanError::MissingColumn(column.to_string())),
        }
    }

    /// Read a nullable text column.
    pub fn opt_str(&self, column: &str) -> Result<Option<&str>, ScanError> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(wrong_type(column, "string", other)),
        }
    }

    /// Read a nullable text column that goes by different names across
    /// server versions. The first name present in the row wins.
    pub fn opt_str_any(&self, columns: &[&str]) -> Result<Option<&str>, ScanError> {
        match columns.iter().find(|c| self.columns.contains_key(**c)) {
            Some(column) => self.opt_str(column),
            None => Err(ScanError::MissingColumn(columns.join("|"))),
        }
    }

    /// Read a nullable boolean column.
    pub fn opt_bool(&self, column: &str) -> Result<Option<bool>, ScanError> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(*b)),
            other => Err(wrong_type(column, "bool", other)),
        }
    }

    /// Read a nullable integer column.
    pub fn opt_i64(&self, column: &str) -> Result<Option<i64>, ScanError> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::Int(n) => Ok(Some(*n)),
            other => Err(wrong_type(column, "int", other)),
        }
    }

    /// Read a text column that must not be NULL.
    pub fn str(&self, column: &str) -> Result<&str, ScanError> {
        self.opt_str(column)?
            .ok_or_else(|| ScanError::UnexpectedNull(column.to_string()))
    }

    /// Read a boolean column that must not be NULL.
    pub fn bool(&self, column: &str) -> Result<bool, ScanError> {
        self.opt_bool(column)?
            .ok_or_else(|| ScanError::UnexpectedNull(column.to_string()))
    }

    /// Read an integer column that must not be NULL.
    pub fn i64(&self, column: &str) -> Result<i64, ScanError> {
        self.opt_i64(column)?
            .ok_or_else(|| ScanError::UnexpectedNull(column.to_string()))
    }
}

fn wrong_type(column: &str, expected: &'static str, actual: &Value) -> ScanError {
    ScanError::WrongType {
        column: column.to_string(),
        expected,
        actual: actual.kind(),
    }
}

/// Extract a value from a Postgres row at a given index.
fn pg_value(row: &tokio_postgres::Row, idx: usize) -> Value {
    let ty = row.columns()[idx].type_();

    let decoded = if *ty == PgTypeInfo::BOOL {
        row.try_get::<_, Option<bool>>(idx).map(Value::from)
    } else if *ty == PgTypeInfo::INT2 {
        row.try_get::<_, Option<i16>>(idx)
            .map(|v| Value::from(v.map(i64::from)))
    } else if *ty == PgTypeInfo::INT4 {
        row.try_get::<_, Option<i32>>(idx)
            .map(|v| Value::from(v.map(i64::from)))
    } else if *ty == PgTypeInfo::INT8 {
        row.try_get::<_, Option<i64>>(idx).map(Value::from)
    } else if *ty == PgTypeInfo::OID {
        row.try_get::<_, Option<u32>>(idx)
            .map(|v| Value::from(v.map(i64::from)))
    } else {
        row.try_get::<_, Option<String>>(idx).map(Value::from)
    };

    decoded.unwrap_or_else(|e| Value::Unreadable {
        pg_type: ty.name().to_string(),
        message: e.to_string(),
    })
}
