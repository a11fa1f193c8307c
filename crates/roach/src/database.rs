//! Databases.

use crate::grant::is_blank;
use crate::provider::ConnectionProvider;
use crate::resource::{Resource, exec};
use crate::traced::{Connection, ConnectionExt, TracedConn};
use crate::{Error, Result, ValidationError};
use facet::Facet;
use roach_sql::{
    AlterDatabaseAction, AlterDatabaseStmt, CreateDatabaseStmt, DropStmt, Lit, Stmt, render,
};

#[derive(Facet, Debug, Clone, PartialEq)]
pub struct Database {
    pub name: String,

    /// Owning role. Left to CockroachDB when unset.
    #[facet(default)]
    pub owner: Option<String>,

    /// Descriptor id from `crdb_internal.databases`, assigned on create.
    #[facet(default)]
    pub id: String,
}

impl Database {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        if is_blank(Some(self.name.as_str())) {
            return Err(ValidationError::EmptyField("name"));
        }
        Ok(())
    }

    fn owner(&self) -> Option<&str> {
        self.owner.as_deref().filter(|o| !o.trim().is_empty())
    }
}

pub fn create_database_sql(database: &Database) -> String {
    render(&Stmt::CreateDatabase(CreateDatabaseStmt {
        name: database.name.clone(),
        owner: database.owner().map(str::to_string),
    }))
}

pub fn rename_database_sql(from: &str, to: &str) -> String {
    render(&Stmt::AlterDatabase(AlterDatabaseStmt {
        name: from.to_string(),
        action: AlterDatabaseAction::RenameTo(to.to_string()),
    }))
}

pub fn alter_owner_sql(name: &str, owner: &str) -> String {
    render(&Stmt::AlterDatabase(AlterDatabaseStmt {
        name: name.to_string(),
        action: AlterDatabaseAction::OwnerTo(owner.to_string()),
    }))
}

pub fn drop_database_sql(name: &str) -> String {
    render(&Stmt::DropDatabase(DropStmt::new(name)))
}

pub fn database_id_sql(name: &str) -> String {
    format!(
        "SELECT id FROM crdb_internal.databases WHERE name = {}",
        Lit(name)
    )
}

pub fn database_by_id_sql(id: i64) -> String {
    format!("SELECT name, owner FROM crdb_internal.databases WHERE id = {id}")
}

/// Reconciles [`Database`]s. Every operation connects to the configured
/// default database.
pub struct DatabaseResource<'a, P> {
    provider: &'a P,
}

impl<'a, P: ConnectionProvider> DatabaseResource<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    async fn lookup_id<C: Connection>(&self, conn: &TracedConn<'_, C>, name: &str) -> Result<String> {
        let rows = conn.query(&database_id_sql(name)).await?;
        let row = rows.first().ok_or_else(|| Error::NotFound {
            kind: "database",
            id: name.to_string(),
        })?;
        Ok(row.i64("id")?.to_string())
    }

    async fn lookup<C: Connection>(&self, conn: &TracedConn<'_, C>, id: &str) -> Result<Database> {
        let numeric: i64 = id.parse().map_err(|_| Error::InvalidIdentity {
            id: id.to_string(),
            expected: "a numeric database id",
        })?;
        let rows = conn.query(&database_by_id_sql(numeric)).await?;
        let row = rows.first().ok_or_else(|| Error::NotFound {
            kind: "database",
            id: id.to_string(),
        })?;
        Ok(Database {
            name: row.str("name")?.to_string(),
            owner: row.opt_str("owner")?.map(str::to_string),
            id: id.to_string(),
        })
    }

    pub async fn create(&self, desired: &Database) -> Result<Database> {
        desired.validate()?;

        let conn = self.provider.connect("").await?;
        let conn = conn.traced();
        exec(&conn, &create_database_sql(desired)).await?;
        let id = self.lookup_id(&conn, &desired.name).await?;
        self.lookup(&conn, &id).await
    }

    pub async fn read(&self, id: &str) -> Result<Database> {
        let conn = self.provider.connect("").await?;
        self.lookup(&conn.traced(), id).await
    }

    /// Rename first, then hand over ownership.
    pub async fn update(&self, state: &Database, desired: &Database) -> Result<Database> {
        desired.validate()?;

        let conn = self.provider.connect("").await?;
        let conn = conn.traced();
        if state.name != desired.name {
            exec(&conn, &rename_database_sql(&state.name, &desired.name)).await?;
        }
        if let Some(owner) = desired.owner()
            && state.owner() != Some(owner)
        {
            exec(&conn, &alter_owner_sql(&desired.name, owner)).await?;
        }

        let id = if state.id.is_empty() {
            self.lookup_id(&conn, &desired.name).await?
        } else {
            state.id.clone()
        };
        self.lookup(&conn, &id).await
    }

    pub async fn delete(&self, state: &Database) -> Result<()> {
        let conn = self.provider.connect("").await?;
        exec(&conn.traced(), &drop_database_sql(&state.name)).await
    }
}

impl<P: ConnectionProvider> Resource for DatabaseResource<'_, P> {
    type Record = Database;
    const KIND: &'static str = "database";

    async fn create(&self, desired: &Database) -> Result<Database> {
        DatabaseResource::create(self, desired).await
    }

    async fn read(&self, id: &str) -> Result<Database> {
        DatabaseResource::read(self, id).await
    }

    async fn update(&self, state: &Database, desired: &Database) -> Result<Database> {
        DatabaseResource::update(self, state, desired).await
    }

    async fn delete(&self, state: &Database) -> Result<()> {
        DatabaseResource::delete(self, state).await
    }
}
