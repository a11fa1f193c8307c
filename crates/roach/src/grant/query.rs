//! GRANT / REVOKE statements for a [`Grant`].

use super::{Grant, ObjectType};
use roach_sql::{GrantOn, GrantStmt, Privileges, RevokeStmt, ShowGrantsStmt, render};

/// The object clause a grant applies to.
fn target(grant: &Grant) -> GrantOn {
    let schema = || grant.schema.clone().unwrap_or_default();
    match grant.object_type {
        ObjectType::Database => GrantOn::Database(grant.database.clone()),
        ObjectType::Schema => GrantOn::Schema(schema()),
        ObjectType::Table if grant.objects.is_empty() => GrantOn::AllTablesInSchema(schema()),
        ObjectType::Table => GrantOn::Tables(grant.objects.clone()),
    }
}

/// `GRANT <privileges> ON <target> TO <role>`.
///
/// Privileges are written in the given order without deduplication.
pub fn grant_sql(grant: &Grant) -> String {
    render(&GrantStmt::new(
        Privileges::List(grant.privileges.clone()),
        target(grant),
        &grant.role,
    ))
}

/// `REVOKE ALL PRIVILEGES ON <target> FROM <role>`.
pub fn revoke_all_sql(grant: &Grant) -> String {
    render(&RevokeStmt::all(target(grant), &grant.role))
}

/// Introspection query listing every privilege held by `role`.
pub fn show_grants_sql(role: &str) -> String {
    render(&ShowGrantsStmt::privileges(role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grant(object_type: ObjectType) -> Grant {
        Grant {
            role: "r".into(),
            database: "defaultdb".into(),
            schema: None,
            object_type,
            objects: vec![],
            privileges: vec!["ALL".into()],
            id: String::new(),
        }
    }

    #[test]
    fn database_grant() {
        let g = grant(ObjectType::Database);
        insta::assert_snapshot!(grant_sql(&g), @r#"GRANT ALL ON DATABASE "defaultdb" TO "r""#);
        insta::assert_snapshot!(revoke_all_sql(&g), @r#"REVOKE ALL PRIVILEGES ON DATABASE "defaultdb" FROM "r""#);
    }

    #[test]
    fn schema_grant() {
        let mut g = grant(ObjectType::Schema);
        g.schema = Some("public".into());
        g.privileges = vec!["CREATE".into(), "USAGE".into()];
        insta::assert_snapshot!(grant_sql(&g), @r#"GRANT CREATE,USAGE ON SCHEMA "public" TO "r""#);
        insta::assert_snapshot!(revoke_all_sql(&g), @r#"REVOKE ALL PRIVILEGES ON SCHEMA "public" FROM "r""#);
    }

    #[test]
    fn schema_wide_table_grant() {
        let mut g = grant(ObjectType::Table);
        g.schema = Some("public".into());
        g.privileges = vec!["SELECT".into(), "INSERT".into()];
        insta::assert_snapshot!(grant_sql(&g), @r#"GRANT SELECT,INSERT ON ALL TABLES IN SCHEMA "public" TO "r""#);
        insta::assert_snapshot!(revoke_all_sql(&g), @r#"REVOKE ALL PRIVILEGES ON ALL TABLES IN SCHEMA "public" FROM "r""#);
    }

    #[test]
    fn explicit_tables_are_written_as_given() {
        let mut g = grant(ObjectType::Table);
        g.schema = Some("public".into());
        g.objects = vec!["orders".into(), "public.items".into()];
        g.privileges = vec!["SELECT".into()];
        insta::assert_snapshot!(grant_sql(&g), @r#"GRANT SELECT ON TABLE orders public.items TO "r""#);
        insta::assert_snapshot!(revoke_all_sql(&g), @r#"REVOKE ALL PRIVILEGES ON TABLE orders public.items FROM "r""#);
    }

    #[test]
    fn privileges_keep_order_and_duplicates() {
        let mut g = grant(ObjectType::Database);
        g.privileges = vec!["CONNECT".into(), "CREATE".into(), "CONNECT".into()];
        insta::assert_snapshot!(grant_sql(&g), @r#"GRANT CONNECT,CREATE,CONNECT ON DATABASE "defaultdb" TO "r""#);
    }

    #[test]
    fn role_with_quote_is_escaped() {
        let mut g = grant(ObjectType::Database);
        g.role = r#"we"ird"#.into();
        insta::assert_snapshot!(grant_sql(&g), @r#"GRANT ALL ON DATABASE "defaultdb" TO "we""ird""#);
        insta::assert_snapshot!(show_grants_sql(&g.role), @r#"SHOW GRANTS FOR "we""ird""#);
    }

    proptest! {
        #[test]
        fn database_grants_mention_nothing_but_the_database(
            role in "[a-z][a-z0-9_]{0,12}",
            database in "[a-z][a-z0-9_]{0,12}",
            privileges in proptest::collection::vec(
                proptest::sample::select(vec!["ALL", "CREATE", "CONNECT", "TEMPORARY"]),
                1..4,
            ),
        ) {
            let g = Grant {
                role: role.clone(),
                database: database.clone(),
                schema: None,
                object_type: ObjectType::Database,
                objects: vec![],
                privileges: privileges.iter().map(|p| p.to_string()).collect(),
                id: String::new(),
            };
            let sql = grant_sql(&g);
            prop_assert!(!sql.contains(" SCHEMA "));
            prop_assert!(!sql.contains(" TABLE "));
            prop_assert_eq!(sql.matches('"').count(), 4);
            let expected_suffix = format!(" ON DATABASE \"{database}\" TO \"{role}\"");
            prop_assert!(sql.ends_with(&expected_suffix));
            prop_assert_eq!(
                sql,
                format!("GRANT {}{}", privileges.join(","), expected_suffix)
            );
        }
    }
}
