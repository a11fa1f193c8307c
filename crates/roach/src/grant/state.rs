//! Turning `SHOW GRANTS` output back into a [`Grant`].

use super::{Grant, ObjectType};
use crate::row::{Row, ScanError};
use tracing::error;

/// One row of `SHOW GRANTS FOR <role>`.
///
/// Every column is nullable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrivilegeRow {
    pub database_name: Option<String>,
    pub schema_name: Option<String>,
    pub relation_name: Option<String>,
    pub grantee: Option<String>,
    pub privilege_type: Option<String>,
    pub is_grantable: Option<bool>,
}

impl PrivilegeRow {
    pub fn from_row(row: &Row) -> Result<Self, ScanError> {
        let owned = |v: Option<&str>| v.map(str::to_string);
        Ok(Self {
            database_name: owned(row.opt_str("database_name")?),
            schema_name: owned(row.opt_str("schema_name")?),
            // Newer CockroachDB versions call this column `object_name`.
            relation_name: owned(row.opt_str_any(&["relation_name", "object_name"])?),
            grantee: owned(row.opt_str("grantee")?),
            privilege_type: owned(row.opt_str("privilege_type")?),
            is_grantable: row.opt_bool("is_grantable")?,
        })
    }
}

/// NULL, empty and whitespace-only all count as absent.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Build the grant `role` holds on `database` for `object_type` out of
/// `SHOW GRANTS` rows.
///
/// Rows that cannot be scanned are logged and skipped. The result carries no
/// id; `objects` stays empty unless a row named a relation.
pub fn read_grants(rows: &[Row], role: &str, database: &str, object_type: ObjectType) -> Grant {
    let mut grant = Grant {
        role: role.to_string(),
        database: database.to_string(),
        schema: None,
        object_type,
        objects: Vec::new(),
        privileges: Vec::new(),
        id: String::new(),
    };

    for (idx, row) in rows.iter().enumerate() {
        let row = match PrivilegeRow::from_row(row) {
            Ok(row) => row,
            Err(e) => {
                error!(row = idx, role, "skipping unreadable grant row: {e}");
                continue;
            }
        };

        let schema = present(&row.schema_name);
        let relation = present(&row.relation_name);

        let keep = match object_type {
            ObjectType::Database => {
                schema.is_none()
                    && relation.is_none()
                    && row.database_name.as_deref() == Some(database)
            }
            ObjectType::Schema => schema.is_some() && relation.is_none(),
            ObjectType::Table => schema.is_some() && relation.is_some(),
        };
        if !keep {
            continue;
        }

        if object_type != ObjectType::Database {
            grant.schema = schema.map(str::to_string);
        }
        if let Some(privilege) = present(&row.privilege_type) {
            grant.privileges.push(privilege.to_string());
        }
        if let Some(relation) = relation {
            grant.objects.push(relation.to_string());
        }
    }

    grant
}
