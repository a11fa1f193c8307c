//! Role memberships: granting one role to another.

use crate::grant::is_blank;
use crate::provider::ConnectionProvider;
use crate::resource::{Resource, exec};
use crate::traced::{Connection, ConnectionExt, TracedConn};
use crate::{Error, Result, ValidationError};
use facet::Facet;
use roach_sql::{RoleMembershipStmt, ShowGrantsStmt, Stmt, render};

/// `user` is a member of `role`.
#[derive(Facet, Debug, Clone, PartialEq)]
pub struct Membership {
    pub role: String,
    pub user: String,

    /// `role|user`, assigned on create.
    #[facet(default)]
    pub id: String,
}

impl Membership {
    pub fn identity(&self) -> String {
        format!("{}|{}", self.role, self.user)
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        if is_blank(Some(self.role.as_str())) {
            return Err(ValidationError::EmptyField("role"));
        }
        if is_blank(Some(self.user.as_str())) {
            return Err(ValidationError::EmptyField("user"));
        }
        Ok(())
    }
}

/// Split a membership identity into role and user.
pub fn parse_membership_identity(id: &str) -> Result<(String, String)> {
    match id.split('|').collect::<Vec<_>>().as_slice() {
        &[role, user] => Ok((role.to_string(), user.to_string())),
        _ => Err(Error::InvalidIdentity {
            id: id.to_string(),
            expected: "role|user",
        }),
    }
}

pub fn grant_role_sql(role: &str, user: &str) -> String {
    render(&Stmt::GrantRole(RoleMembershipStmt::new(role, user)))
}

pub fn revoke_role_sql(role: &str, user: &str) -> String {
    render(&Stmt::RevokeRole(RoleMembershipStmt::new(role, user)))
}

pub fn show_memberships_sql(user: &str) -> String {
    render(&ShowGrantsStmt::role_memberships(user))
}

/// Reconciles [`Membership`]s. Every operation connects to the configured
/// default database.
pub struct MembershipResource<'a, P> {
    provider: &'a P,
}

impl<'a, P: ConnectionProvider> MembershipResource<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    async fn lookup<C: Connection>(
        &self,
        conn: &TracedConn<'_, C>,
        role: &str,
        user: &str,
    ) -> Result<Membership> {
        let rows = conn.query(&show_memberships_sql(user)).await?;
        for row in &rows {
            if row.opt_str("role_name")? == Some(role) {
                let membership = Membership {
                    role: role.to_string(),
                    user: row.opt_str("member")?.unwrap_or(user).to_string(),
                    id: String::new(),
                };
                return Ok(Membership {
                    id: membership.identity(),
                    ..membership
                });
            }
        }
        Err(Error::NotFound {
            kind: "role membership",
            id: format!("{role}|{user}"),
        })
    }

    pub async fn create(&self, desired: &Membership) -> Result<Membership> {
        desired.validate()?;

        let conn = self.provider.connect("").await?;
        exec(&conn.traced(), &grant_role_sql(&desired.role, &desired.user)).await?;
        Ok(Membership {
            id: desired.identity(),
            ..desired.clone()
        })
    }

    pub async fn read(&self, id: &str) -> Result<Membership> {
        let (role, user) = parse_membership_identity(id)?;
        let conn = self.provider.connect("").await?;
        self.lookup(&conn.traced(), &role, &user).await
    }

    /// Revoke the old membership and grant the new one.
    pub async fn update(&self, state: &Membership, desired: &Membership) -> Result<Membership> {
        desired.validate()?;

        let conn = self.provider.connect("").await?;
        let conn = conn.traced();
        exec(&conn, &revoke_role_sql(&state.role, &state.user)).await?;
        exec(&conn, &grant_role_sql(&desired.role, &desired.user)).await?;
        Ok(Membership {
            id: desired.identity(),
            ..desired.clone()
        })
    }

    pub async fn delete(&self, state: &Membership) -> Result<()> {
        let conn = self.provider.connect("").await?;
        exec(&conn.traced(), &revoke_role_sql(&state.role, &state.user)).await
    }
}

impl<P: ConnectionProvider> Resource for MembershipResource<'_, P> {
    type Record = Membership;
    const KIND: &'static str = "grant-role";

    async fn create(&self, desired: &Membership) -> Result<Membership> {
        MembershipResource::create(self, desired).await
    }

    async fn read(&self, id: &str) -> Result<Membership> {
        MembershipResource::read(self, id).await
    }

    async fn update(&self, state: &Membership, desired: &Membership) -> Result<Membership> {
        MembershipResource::update(self, state, desired).await
    }

    async fn delete(&self, state: &Membership) -> Result<()> {
        MembershipResource::delete(self, state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements() {
        insta::assert_snapshot!(grant_role_sql("admin", "alice"), @r#"GRANT "admin" TO "alice""#);
        insta::assert_snapshot!(revoke_role_sql("admin", "alice"), @r#"REVOKE "admin" FROM "alice""#);
        insta::assert_snapshot!(show_memberships_sql("alice"), @r#"SHOW GRANTS ON ROLE FOR "alice""#);
    }

    #[test]
    fn identity() {
        let m = Membership {
            role: "admin".into(),
            user: "alice".into(),
            id: String::new(),
        };
        assert_eq!(m.identity(), "admin|alice");
        assert_eq!(
            parse_membership_identity("admin|alice").unwrap(),
            ("admin".to_string(), "alice".to_string())
        );
        assert!(matches!(
            parse_membership_identity("admin"),
            Err(Error::InvalidIdentity { .. })
        ));
        assert!(matches!(
            parse_membership_identity("a|b|c"),
            Err(Error::InvalidIdentity { .. })
        ));
    }
}
