//! Roles and users.

use crate::grant::is_blank;
use crate::provider::ConnectionProvider;
use crate::resource::{Resource, exec, exec_as};
use crate::row::Row;
use crate::traced::{Connection, ConnectionExt, TracedConn};
use crate::{Error, Result, ValidationError};
use facet::Facet;
use roach_sql::{DropStmt, Lit, Password, RoleStmt, Stmt, render};

/// A role. Roles with a password and `login` are what CockroachDB calls users.
#[derive(Facet, Debug, Clone, PartialEq)]
pub struct Role {
    pub name: String,

    /// Never read back from the database.
    #[facet(default)]
    pub password: Option<String>,

    #[facet(default)]
    pub create_database: bool,

    #[facet(default)]
    pub create_role: bool,

    #[facet(default)]
    pub login: bool,

    /// The role name, assigned on create.
    #[facet(default)]
    pub id: String,
}

impl Role {
    fn stmt(&self, password: Password) -> RoleStmt {
        RoleStmt {
            name: self.name.clone(),
            create_database: self.create_database,
            create_role: self.create_role,
            login: self.login,
            password,
        }
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        if is_blank(Some(self.name.as_str())) {
            return Err(ValidationError::EmptyField("name"));
        }
        Ok(())
    }
}

/// Render a CREATE/ALTER ROLE twice: once to run, once with the password
/// masked for logs.
fn with_password(role: &Role, absent: Password, wrap: fn(RoleStmt) -> Stmt) -> (String, String) {
    let (password, masked) = match &role.password {
        Some(secret) => (
            Password::Set(secret.clone()),
            Password::Set("<redacted>".to_string()),
        ),
        None => (absent.clone(), absent),
    };
    (
        render(&wrap(role.stmt(password))),
        render(&wrap(role.stmt(masked))),
    )
}

pub fn create_role_sql(role: &Role) -> String {
    with_password(role, Password::Omit, Stmt::CreateRole).0
}

/// `ALTER ROLE`. Without a password, any existing one is removed.
pub fn alter_role_sql(role: &Role) -> String {
    with_password(role, Password::Null, Stmt::AlterRole).0
}

pub fn drop_role_sql(name: &str) -> String {
    render(&Stmt::DropRole(DropStmt::new(name)))
}

pub fn lookup_role_sql(name: &str) -> String {
    format!(
        "SELECT rolname, rolcreaterole, rolcreatedb, rolcanlogin FROM pg_roles WHERE rolname = {}",
        Lit(name)
    )
}

fn role_from_row(row: &Row) -> Result<Role> {
    let name = row.str("rolname")?.to_string();
    Ok(Role {
        create_role: row.bool("rolcreaterole")?,
        create_database: row.bool("rolcreatedb")?,
        login: row.bool("rolcanlogin")?,
        password: None,
        id: name.clone(),
        name,
    })
}

/// Reconciles [`Role`]s. Roles are cluster-wide, so every operation connects
/// to the configured default database.
pub struct RoleResource<'a, P> {
    provider: &'a P,
}

impl<'a, P: ConnectionProvider> RoleResource<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    async fn lookup<C: Connection>(&self, conn: &TracedConn<'_, C>, name: &str) -> Result<Role> {
        let rows = conn.query(&lookup_role_sql(name)).await?;
        let row = rows.first().ok_or_else(|| Error::NotFound {
            kind: "role",
            id: name.to_string(),
        })?;
        role_from_row(row)
    }

    pub async fn create(&self, desired: &Role) -> Result<Role> {
        desired.validate()?;

        let conn = self.provider.connect("").await?;
        let conn = conn.traced();
        let (sql, shown) = with_password(desired, Password::Omit, Stmt::CreateRole);
        exec_as(&conn, &sql, &shown).await?;

        let mut record = self.lookup(&conn, &desired.name).await?;
        record.password = desired.password.clone();
        Ok(record)
    }

    pub async fn read(&self, id: &str) -> Result<Role> {
        let conn = self.provider.connect("").await?;
        self.lookup(&conn.traced(), id).await
    }

    /// Apply `desired`'s options and password. Renaming is refused.
    pub async fn update(&self, state: &Role, desired: &Role) -> Result<Role> {
        desired.validate()?;
        if state.name != desired.name {
            return Err(ValidationError::ImmutableName {
                kind: "role",
                from: state.name.clone(),
                to: desired.name.clone(),
            }
            .into());
        }

        let conn = self.provider.connect("").await?;
        let conn = conn.traced();
        let (sql, shown) = with_password(desired, Password::Null, Stmt::AlterRole);
        exec_as(&conn, &sql, &shown).await?;

        let mut record = self.lookup(&conn, &desired.name).await?;
        record.password = desired.password.clone();
        Ok(record)
    }

    pub async fn delete(&self, state: &Role) -> Result<()> {
        let conn = self.provider.connect("").await?;
        exec(&conn.traced(), &drop_role_sql(&state.name)).await
    }
}

impl<P: ConnectionProvider> Resource for RoleResource<'_, P> {
    type Record = Role;
    const KIND: &'static str = "role";

    async fn create(&self, desired: &Role) -> Result<Role> {
        RoleResource::create(self, desired).await
    }

    async fn read(&self, id: &str) -> Result<Role> {
        RoleResource::read(self, id).await
    }

    async fn update(&self, state: &Role, desired: &Role) -> Result<Role> {
        RoleResource::update(self, state, desired).await
    }

    async fn delete(&self, state: &Role) -> Result<()> {
        RoleResource::delete(self, state).await
    }
}
