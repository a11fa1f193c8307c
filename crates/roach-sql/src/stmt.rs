//! SQL statements.

/// A SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Grant(GrantStmt),
    Revoke(RevokeStmt),
    GrantRole(RoleMembershipStmt),
    RevokeRole(RoleMembershipStmt),
    CreateRole(RoleStmt),
    AlterRole(RoleStmt),
    DropRole(DropStmt),
    CreateDatabase(CreateDatabaseStmt),
    AlterDatabase(AlterDatabaseStmt),
    DropDatabase(DropStmt),
    ShowGrants(ShowGrantsStmt),
}

/// The privilege list of a GRANT or REVOKE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Privileges {
    /// `ALL PRIVILEGES`
    All,

    /// Named privileges, rendered in order, comma-joined with no whitespace.
    List(Vec<String>),
}

/// The object a GRANT or REVOKE applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantOn {
    /// `DATABASE "db"`
    Database(String),

    /// `SCHEMA "schema"`
    Schema(String),

    /// `TABLE a b c`
    ///
    /// Table names are written as given: they may be schema-qualified or
    /// already quoted, so this variant does not quote them.
    Tables(Vec<String>),

    /// `ALL TABLES IN SCHEMA "schema"`
    AllTablesInSchema(String),
}

/// `GRANT <privileges> ON <object> TO <grantee>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantStmt {
    pub privileges: Privileges,
    pub on: GrantOn,
    pub grantee: String,
}

impl GrantStmt {
    pub fn new(privileges: Privileges, on: GrantOn, grantee: impl Into<String>) -> Self {
        Self {
            privileges,
            on,
            grantee: grantee.into(),
        }
    }
}

/// `REVOKE <privileges> ON <object> FROM <grantee>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeStmt {
    pub privileges: Privileges,
    pub on: GrantOn,
    pub grantee: String,
}

impl RevokeStmt {
    /// `REVOKE ALL PRIVILEGES ON <object> FROM <grantee>`
    pub fn all(on: GrantOn, grantee: impl Into<String>) -> Self {
        Self {
            privileges: Privileges::All,
            on,
            grantee: grantee.into(),
        }
    }
}

/// `GRANT <role> TO <member>` / `REVOKE <role> FROM <member>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMembershipStmt {
    pub role: String,
    pub member: String,
}

impl RoleMembershipStmt {
    pub fn new(role: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            member: member.into(),
        }
    }
}

/// Password clause of CREATE ROLE / ALTER ROLE.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Password {
    /// No PASSWORD clause at all.
    #[default]
    Omit,

    /// `PASSWORD NULL`, which removes an existing password.
    Null,

    /// `PASSWORD '<secret>'`
    Set(String),
}

/// `CREATE ROLE` / `ALTER ROLE` with the full option set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleStmt {
    pub name: String,
    pub create_database: bool,
    pub create_role: bool,
    pub login: bool,
    pub password: Password,
}

/// `DROP ROLE <name>` / `DROP DATABASE <name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropStmt {
    pub name: String,
}

impl DropStmt {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// `CREATE DATABASE <name> [OWNER <owner>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDatabaseStmt {
    pub name: String,
    pub owner: Option<String>,
}

/// `ALTER DATABASE <name> ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterDatabaseStmt {
    pub name: String,
    pub action: AlterDatabaseAction,
}

/// What an ALTER DATABASE changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterDatabaseAction {
    RenameTo(String),
    OwnerTo(String),
}

/// `SHOW GRANTS FOR <grantee>` / `SHOW GRANTS ON ROLE FOR <grantee>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowGrantsStmt {
    pub grantee: String,

    /// Show role memberships instead of object privileges.
    pub on_role: bool,
}

impl ShowGrantsStmt {
    pub fn privileges(grantee: impl Into<String>) -> Self {
        Self {
            grantee: grantee.into(),
            on_role: false,
        }
    }

    pub fn role_memberships(grantee: impl Into<String>) -> Self {
        Self {
            grantee: grantee.into(),
            on_role: true,
        }
    }
}
