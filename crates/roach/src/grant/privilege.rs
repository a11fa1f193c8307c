//! Which privileges may be granted on which kind of object.

use crate::ValidationError;

/// Privileges CockroachDB accepts on a database.
pub const DATABASE_PRIVILEGES: &[&str] = &["ALL", "CREATE", "CONNECT", "TEMPORARY"];

/// Privileges CockroachDB accepts on a table.
pub const TABLE_PRIVILEGES: &[&str] = &[
    "ALL",
    "SELECT",
    "INSERT",
    "UPDATE",
    "DELETE",
    "TRUNCATE",
    "REFERENCES",
    "TRIGGER",
];

/// Privileges CockroachDB accepts on a schema.
pub const SCHEMA_PRIVILEGES: &[&str] = &["ALL", "CREATE", "USAGE"];

/// The allow-list for an object type, if it is one we know.
pub fn allowed_privileges(object_type: &str) -> Option<&'static [&'static str]> {
    match object_type {
        "database" => Some(DATABASE_PRIVILEGES),
        "table" => Some(TABLE_PRIVILEGES),
        "schema" => Some(SCHEMA_PRIVILEGES),
        _ => None,
    }
}

/// Check every privilege against the allow-list for `object_type`.
///
/// Matching is exact: `select` is not `SELECT`. The first offending privilege
/// is reported.
pub fn validate_privileges(
    object_type: &str,
    privileges: &[String],
) -> Result<(), ValidationError> {
    let allowed = allowed_privileges(object_type)
        .ok_or_else(|| ValidationError::UnknownObjectType(object_type.to_string()))?;

    match privileges.iter().find(|p| !allowed.contains(&p.as_str())) {
        Some(privilege) => Err(ValidationError::DisallowedPrivilege {
            privilege: privilege.clone(),
            object_type: object_type.to_string(),
        }),
        None => Ok(()),
    }
}
