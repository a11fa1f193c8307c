//! Runtime values read from result rows.

/// A column value as read from CockroachDB.
///
/// Introspection queries only ever return text, booleans and integers, so
/// that is all this carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// NULL
    Null,

    /// Boolean
    Bool(bool),

    /// Any integer width (INT2, INT4, INT8, OID)
    Int(i64),

    /// Text (STRING, TEXT, VARCHAR, NAME, etc.)
    String(String),

    /// A column whose wire value could not be decoded.
    Unreadable {
        /// Postgres type name reported for the column.
        pg_type: String,
        /// Decoder error message.
        message: String,
    },
}

impl Value {
    /// Short name of the value's kind, used in scan errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::String(_) => "string",
            Value::Unreadable { .. } => "unreadable",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
