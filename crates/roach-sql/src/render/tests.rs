use crate::*;

fn privileges(list: &[&str]) -> Privileges {
    Privileges::List(list.iter().map(|p| p.to_string()).collect())
}

#[test]
fn test_grant_on_database() {
    let stmt = GrantStmt::new(
        privileges(&["ALL"]),
        GrantOn::Database("defaultdb".into()),
        "r",
    );
    insta::assert_snapshot!(render(&stmt), @r#"GRANT ALL ON DATABASE "defaultdb" TO "r""#);
}

#[test]
fn test_grant_privileges_keep_order_and_duplicates() {
    let stmt = GrantStmt::new(
        privileges(&["USAGE", "CREATE", "USAGE"]),
        GrantOn::Schema("public".into()),
        "app",
    );
    insta::assert_snapshot!(render(&stmt), @r#"GRANT USAGE,CREATE,USAGE ON SCHEMA "public" TO "app""#);
}

#[test]
fn test_grant_on_tables_leaves_names_unquoted() {
    let stmt = GrantStmt::new(
        privileges(&["SELECT", "INSERT"]),
        GrantOn::Tables(vec!["orders".into(), "public.items".into()]),
        "reporting",
    );
    insta::assert_snapshot!(render(&stmt), @r#"GRANT SELECT,INSERT ON TABLE orders public.items TO "reporting""#);
}

#[test]
fn test_grant_on_all_tables_in_schema() {
    let stmt = GrantStmt::new(
        privileges(&["SELECT"]),
        GrantOn::AllTablesInSchema("sales".into()),
        "reporting",
    );
    insta::assert_snapshot!(render(&stmt), @r#"GRANT SELECT ON ALL TABLES IN SCHEMA "sales" TO "reporting""#);
}

#[test]
fn test_revoke_all() {
    let stmt = RevokeStmt::all(GrantOn::Database("defaultdb".into()), "r");
    insta::assert_snapshot!(render(&stmt), @r#"REVOKE ALL PRIVILEGES ON DATABASE "defaultdb" FROM "r""#);

    let stmt = RevokeStmt::all(GrantOn::AllTablesInSchema("public".into()), "r");
    insta::assert_snapshot!(render(&stmt), @r#"REVOKE ALL PRIVILEGES ON ALL TABLES IN SCHEMA "public" FROM "r""#);
}

#[test]
fn test_grantee_is_escaped() {
    let stmt = RevokeStmt::all(GrantOn::Schema("we\"ird".into()), "a\"b");
    insta::assert_snapshot!(render(&stmt), @r#"REVOKE ALL PRIVILEGES ON SCHEMA "we""ird" FROM "a""b""#);
}

#[test]
fn test_create_role_defaults() {
    let stmt = Stmt::CreateRole(RoleStmt {
        name: "simple".into(),
        create_database: false,
        create_role: false,
        login: false,
        password: Password::Omit,
    });
    insta::assert_snapshot!(render(&stmt), @r#"CREATE ROLE "simple" WITH NOCREATEDB NOCREATEROLE NOLOGIN"#);
}

#[test]
fn test_create_role_with_password() {
    let stmt = Stmt::CreateRole(RoleStmt {
        name: "complex".into(),
        create_database: true,
        create_role: true,
        login: true,
        password: Password::Set("it's secret".into()),
    });
    insta::assert_snapshot!(render(&stmt), @r#"CREATE ROLE "complex" WITH CREATEDB CREATEROLE LOGIN PASSWORD 'it''s secret'"#);
}

#[test]
fn test_alter_role_clears_password() {
    let stmt = Stmt::AlterRole(RoleStmt {
        name: "complex".into(),
        create_database: false,
        create_role: true,
        login: false,
        password: Password::Null,
    });
    insta::assert_snapshot!(render(&stmt), @r#"ALTER ROLE "complex" WITH NOCREATEDB CREATEROLE NOLOGIN PASSWORD NULL"#);
}

#[test]
fn test_drop_role() {
    let stmt = Stmt::DropRole(DropStmt::new("simple"));
    insta::assert_snapshot!(render(&stmt), @r#"DROP ROLE "simple""#);
}

#[test]
fn test_role_membership() {
    let grant = Stmt::GrantRole(RoleMembershipStmt::new("admin", "alice"));
    insta::assert_snapshot!(render(&grant), @r#"GRANT "admin" TO "alice""#);

    let revoke = Stmt::RevokeRole(RoleMembershipStmt::new("admin", "alice"));
    insta::assert_snapshot!(render(&revoke), @r#"REVOKE "admin" FROM "alice""#);
}

#[test]
fn test_database_ddl() {
    let create = Stmt::CreateDatabase(CreateDatabaseStmt {
        name: "shop".into(),
        owner: None,
    });
    insta::assert_snapshot!(render(&create), @r#"CREATE DATABASE "shop""#);

    let create = Stmt::CreateDatabase(CreateDatabaseStmt {
        name: "shop".into(),
        owner: Some("shop_owner".into()),
    });
    insta::assert_snapshot!(render(&create), @r#"CREATE DATABASE "shop" OWNER "shop_owner""#);

    let rename = Stmt::AlterDatabase(AlterDatabaseStmt {
        name: "shop".into(),
        action: AlterDatabaseAction::RenameTo("store".into()),
    });
    insta::assert_snapshot!(render(&rename), @r#"ALTER DATABASE "shop" RENAME TO "store""#);

    let owner = Stmt::AlterDatabase(AlterDatabaseStmt {
        name: "store".into(),
        action: AlterDatabaseAction::OwnerTo("root".into()),
    });
    insta::assert_snapshot!(render(&owner), @r#"ALTER DATABASE "store" OWNER TO "root""#);

    let drop = Stmt::DropDatabase(DropStmt::new("store"));
    insta::assert_snapshot!(render(&drop), @r#"DROP DATABASE "store""#);
}

#[test]
fn test_show_grants() {
    let stmt = Stmt::ShowGrants(ShowGrantsStmt::privileges("r"));
    insta::assert_snapshot!(render(&stmt), @r#"SHOW GRANTS FOR "r""#);

    let stmt = Stmt::ShowGrants(ShowGrantsStmt::role_memberships("alice"));
    insta::assert_snapshot!(render(&stmt), @r#"SHOW GRANTS ON ROLE FOR "alice""#);
}
