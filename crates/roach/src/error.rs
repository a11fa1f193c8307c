use crate::grant::ObjectType;
use crate::row::ScanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Connecting, TLS setup, authentication or the post-connect ping failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// A statement was rejected by the database.
    #[error("sql error: {0}")]
    Execution(String),

    /// A row the database returned did not have the expected shape.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("invalid id {id:?}: expected {expected}")]
    InvalidIdentity { id: String, expected: &'static str },

    #[error("{kind} {id:?} not found")]
    NotFound { kind: &'static str, id: String },
}

impl Error {
    pub(crate) fn connection(err: impl std::fmt::Display) -> Self {
        Error::Connection(err.to_string())
    }

    pub(crate) fn execution(err: impl std::fmt::Display) -> Self {
        Error::Execution(err.to_string())
    }
}

/// A desired record that must not be sent to the database.
///
/// Always reported before any connection is opened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown object type {0}")]
    UnknownObjectType(String),

    #[error("{privilege} is not an allowed privilege for object type {object_type}")]
    DisallowedPrivilege {
        privilege: String,
        object_type: String,
    },

    #[error("Cannot specify `objects` when `object_type` is `{0}`")]
    ObjectsNotAllowed(ObjectType),

    #[error("Cannot specify `schema` when `object_type` is `database`")]
    SchemaNotAllowed,

    #[error("`{0}` must not be empty")]
    EmptyField(&'static str),

    #[error("at least one privilege is required")]
    NoPrivileges,

    #[error("{kind} name cannot be changed in place (from {from:?} to {to:?}), create a new {kind}")]
    ImmutableName {
        kind: &'static str,
        from: String,
        to: String,
    },
}
