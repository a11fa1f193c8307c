//! Render statements to SQL text.

use std::fmt;

use crate::Ident;
use crate::stmt::*;

/// Wrapper for rendering a `Render` type via `Display`.
///
/// Allows using `write!(f, "{}", Fmt(&stmt))` in format strings.
pub struct Fmt<'a, T: Render>(pub &'a T);

impl<T: Render> fmt::Display for Fmt<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f)
    }
}

// ============================================================================
// Render implementations
// ============================================================================

/// Trait for types that can be rendered to SQL.
pub trait Render {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl Render for Privileges {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Privileges::All => write!(f, "ALL PRIVILEGES"),
            Privileges::List(privileges) => write!(f, "{}", privileges.join(",")),
        }
    }
}

impl Render for GrantOn {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantOn::Database(name) => write!(f, "DATABASE {}", Ident(name)),
            GrantOn::Schema(name) => write!(f, "SCHEMA {}", Ident(name)),
            GrantOn::Tables(tables) => write!(f, "TABLE {}", tables.join(" ")),
            GrantOn::AllTablesInSchema(schema) => {
                write!(f, "ALL TABLES IN SCHEMA {}", Ident(schema))
            }
        }
    }
}

impl Render for GrantStmt {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let privileges = Fmt(&self.privileges);
        let on = Fmt(&self.on);
        let grantee = Ident(&self.grantee);
        write!(f, "GRANT {privileges} ON {on} TO {grantee}")
    }
}

impl Render for RevokeStmt {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let privileges = Fmt(&self.privileges);
        let on = Fmt(&self.on);
        let grantee = Ident(&self.grantee);
        write!(f, "REVOKE {privileges} ON {on} FROM {grantee}")
    }
}

impl Render for RoleStmt {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = Ident(&self.name);
        write!(f, "ROLE {name} WITH")?;
        write!(f, " {}", flag(self.create_database, "CREATEDB"))?;
        write!(f, " {}", flag(self.create_role, "CREATEROLE"))?;
        write!(f, " {}", flag(self.login, "LOGIN"))?;
        match &self.password {
            Password::Omit => Ok(()),
            Password::Null => write!(f, " PASSWORD NULL"),
            Password::Set(secret) => write!(f, " PASSWORD {}", crate::Lit(secret)),
        }
    }
}

/// `CREATEDB` or `NOCREATEDB`, and so on.
fn flag(enabled: bool, name: &str) -> String {
    if enabled {
        name.to_string()
    } else {
        format!("NO{name}")
    }
}

impl Render for CreateDatabaseStmt {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE DATABASE {}", Ident(&self.name))?;
        if let Some(owner) = &self.owner {
            write!(f, " OWNER {}", Ident(owner))?;
        }
        Ok(())
    }
}

impl Render for AlterDatabaseStmt {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = Ident(&self.name);
        match &self.action {
            AlterDatabaseAction::RenameTo(to) => {
                write!(f, "ALTER DATABASE {name} RENAME TO {}", Ident(to))
            }
            AlterDatabaseAction::OwnerTo(owner) => {
                write!(f, "ALTER DATABASE {name} OWNER TO {}", Ident(owner))
            }
        }
    }
}

impl Render for ShowGrantsStmt {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grantee = Ident(&self.grantee);
        if self.on_role {
            write!(f, "SHOW GRANTS ON ROLE FOR {grantee}")
        } else {
            write!(f, "SHOW GRANTS FOR {grantee}")
        }
    }
}

impl Render for Stmt {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Grant(s) => s.render(f),
            Stmt::Revoke(s) => s.render(f),
            Stmt::GrantRole(s) => {
                write!(f, "GRANT {} TO {}", Ident(&s.role), Ident(&s.member))
            }
            Stmt::RevokeRole(s) => {
                write!(f, "REVOKE {} FROM {}", Ident(&s.role), Ident(&s.member))
            }
            Stmt::CreateRole(s) => write!(f, "CREATE {}", Fmt(s)),
            Stmt::AlterRole(s) => write!(f, "ALTER {}", Fmt(s)),
            Stmt::DropRole(s) => write!(f, "DROP ROLE {}", Ident(&s.name)),
            Stmt::CreateDatabase(s) => s.render(f),
            Stmt::AlterDatabase(s) => s.render(f),
            Stmt::DropDatabase(s) => write!(f, "DROP DATABASE {}", Ident(&s.name)),
            Stmt::ShowGrants(s) => s.render(f),
        }
    }
}

// ============================================================================
// Convenience methods
// ============================================================================

/// Render a statement to SQL.
pub fn render(stmt: &impl Render) -> String {
    format!("{}", Fmt(stmt))
}

#[cfg(test)]
mod tests;
