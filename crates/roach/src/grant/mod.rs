//! Privilege grants on databases, schemas and tables.
//!
//! A [`Grant`] says: `role` holds `privileges` on some objects of one
//! `object_type` inside `database`. Reconciling one always follows the same
//! shape: revoke everything the role holds on the target, grant the declared
//! privileges, then read back what CockroachDB reports and return that.

mod privilege;
mod query;
mod state;

pub use privilege::{
    DATABASE_PRIVILEGES, SCHEMA_PRIVILEGES, TABLE_PRIVILEGES, allowed_privileges,
    validate_privileges,
};
pub use query::{grant_sql, revoke_all_sql, show_grants_sql};
pub use state::{PrivilegeRow, is_blank, read_grants};

use crate::provider::ConnectionProvider;
use crate::resource::{Resource, exec};
use crate::traced::{Connection, ConnectionExt, TracedConn};
use crate::{Error, Result, ValidationError};
use facet::Facet;
use std::fmt;
use std::str::FromStr;

/// Kind of object a grant applies to.
#[derive(Facet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[facet(rename_all = "kebab-case")]
#[repr(u8)]
pub enum ObjectType {
    Database,
    Schema,
    Table,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Database => "database",
            ObjectType::Schema => "schema",
            ObjectType::Table => "table",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "database" => Ok(ObjectType::Database),
            "schema" => Ok(ObjectType::Schema),
            "table" => Ok(ObjectType::Table),
            other => Err(ValidationError::UnknownObjectType(other.to_string())),
        }
    }
}

/// A set of privileges held by a role.
#[derive(Facet, Debug, Clone, PartialEq)]
pub struct Grant {
    /// Role receiving the privileges.
    pub role: String,

    /// Database the privileges live in. Also the database connected to.
    pub database: String,

    /// Schema for schema grants and schema-wide table grants.
    #[facet(default)]
    pub schema: Option<String>,

    pub object_type: ObjectType,

    /// Tables for table grants. Empty means every table in `schema`.
    #[facet(default)]
    pub objects: Vec<String>,

    pub privileges: Vec<String>,

    /// `role|database|object_type`, assigned on create.
    #[facet(default)]
    pub id: String,
}

const GRANT_ID_FORMAT: &str = "role|database|object_type";

/// Identity of the grant `role` holds on `database` for `object_type`.
///
/// The parts are joined with `|` and not escaped.
pub fn identity(role: &str, database: &str, object_type: ObjectType) -> String {
    format!("{role}|{database}|{object_type}")
}

/// Split a grant identity back into role, database and object type.
pub fn parse_identity(id: &str) -> Result<(String, String, ObjectType)> {
    let invalid = || Error::InvalidIdentity {
        id: id.to_string(),
        expected: GRANT_ID_FORMAT,
    };
    let parts: Vec<&str> = id.split('|').collect();
    let &[role, database, object_type] = parts.as_slice() else {
        return Err(invalid());
    };
    let object_type = object_type.parse().map_err(|_| invalid())?;
    Ok((role.to_string(), database.to_string(), object_type))
}

impl Grant {
    /// The identity this grant gets once created.
    pub fn identity(&self) -> String {
        identity(&self.role, &self.database, self.object_type)
    }

    /// Check the grant is well-formed before anything is sent to the database.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if is_blank(Some(self.role.as_str())) {
            return Err(ValidationError::EmptyField("role"));
        }
        if is_blank(Some(self.database.as_str())) {
            return Err(ValidationError::EmptyField("database"));
        }
        if self.privileges.is_empty() {
            return Err(ValidationError::NoPrivileges);
        }

        let has_schema = !is_blank(self.schema.as_deref());
        match self.object_type {
            ObjectType::Database | ObjectType::Schema if !self.objects.is_empty() => {
                return Err(ValidationError::ObjectsNotAllowed(self.object_type));
            }
            // Any schema text at all, even whitespace, is refused here.
            ObjectType::Database if self.schema.as_deref().is_some_and(|s| !s.is_empty()) => {
                return Err(ValidationError::SchemaNotAllowed);
            }
            ObjectType::Schema if !has_schema => return Err(ValidationError::EmptyField("schema")),
            ObjectType::Table if self.objects.is_empty() && !has_schema => {
                return Err(ValidationError::EmptyField("schema"));
            }
            _ => {}
        }

        validate_privileges(self.object_type.as_str(), &self.privileges)
    }

    /// Fold what the database reported into this record.
    ///
    /// Privileges are always replaced. Objects and schema are only replaced
    /// when something was observed, so a schema-wide grant keeps its empty
    /// object list.
    pub fn absorb(&mut self, observed: Grant) {
        self.privileges = observed.privileges;
        if !observed.objects.is_empty() {
            self.objects = observed.objects;
        }
        if observed.schema.is_some() {
            self.schema = observed.schema;
        }
    }
}

/// Reconciles [`Grant`]s.
pub struct GrantResource<'a, P> {
    provider: &'a P,
}

impl<'a, P: ConnectionProvider> GrantResource<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    async fn observe<C: Connection>(
        &self,
        conn: &TracedConn<'_, C>,
        role: &str,
        database: &str,
        object_type: ObjectType,
    ) -> Result<Grant> {
        let rows = conn.query(&show_grants_sql(role)).await?;
        Ok(read_grants(&rows, role, database, object_type))
    }

    /// Grant `desired` on an open connection and return the synced record.
    async fn apply<C: Connection>(&self, conn: &TracedConn<'_, C>, desired: &Grant) -> Result<Grant> {
        exec(conn, &grant_sql(desired)).await?;

        let mut record = desired.clone();
        record.id = desired.identity();
        let observed = self
            .observe(conn, &desired.role, &desired.database, desired.object_type)
            .await?;
        record.absorb(observed);
        Ok(record)
    }

    pub async fn create(&self, desired: &Grant) -> Result<Grant> {
        desired.validate()?;

        let conn = self.provider.connect(&desired.database).await?;
        let conn = conn.traced();
        exec(&conn, &revoke_all_sql(desired)).await?;
        self.apply(&conn, desired).await
    }

    pub async fn read(&self, id: &str) -> Result<Grant> {
        let (role, database, object_type) = parse_identity(id)?;

        let conn = self.provider.connect(&database).await?;
        let mut record = Grant {
            role,
            database,
            schema: None,
            object_type,
            objects: Vec::new(),
            privileges: Vec::new(),
            id: id.to_string(),
        };
        let observed = self
            .observe(&conn.traced(), &record.role, &record.database, object_type)
            .await?;
        record.absorb(observed);
        Ok(record)
    }

    /// Revoke what `state` describes, then grant `desired`.
    ///
    /// A failure between the two leaves the role without the grant.
    pub async fn update(&self, state: &Grant, desired: &Grant) -> Result<Grant> {
        desired.validate()?;

        let old = self.provider.connect(&state.database).await?;
        exec(&old.traced(), &revoke_all_sql(state)).await?;

        let fresh;
        let conn = if desired.database == state.database {
            &old
        } else {
            fresh = self.provider.connect(&desired.database).await?;
            &fresh
        };
        self.apply(&conn.traced(), desired).await
    }

    pub async fn delete(&self, state: &Grant) -> Result<()> {
        let conn = self.provider.connect(&state.database).await?;
        exec(&conn.traced(), &revoke_all_sql(state)).await
    }
}

impl<P: ConnectionProvider> Resource for GrantResource<'_, P> {
    type Record = Grant;
    const KIND: &'static str = "grant";

    async fn create(&self, desired: &Grant) -> Result<Grant> {
        GrantResource::create(self, desired).await
    }

    async fn read(&self, id: &str) -> Result<Grant> {
        GrantResource::read(self, id).await
    }

    async fn update(&self, state: &Grant, desired: &Grant) -> Result<Grant> {
        GrantResource::update(self, state, desired).await
    }

    async fn delete(&self, state: &Grant) -> Result<()> {
        GrantResource::delete(self, state).await
    }
}
