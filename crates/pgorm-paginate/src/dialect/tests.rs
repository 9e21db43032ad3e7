use super::*;

const SQL: &str = "SELECT * FROM users WHERE age > ? ORDER BY name";

#[test]
fn count_wraps_in_derived_table() {
    for dialect in [
        DialectKind::Postgres,
        DialectKind::MySql,
        DialectKind::Oracle,
        DialectKind::Sqlite,
        DialectKind::H2,
    ] {
        assert_eq!(
            dialect.dialect().count_sql(SQL),
            "SELECT COUNT(*) FROM (SELECT * FROM users WHERE age > ? ORDER BY name) tmp_count",
            "{dialect}"
        );
    }
}

#[test]
fn count_keeps_inner_limit() {
    assert_eq!(
        PostgresDialect.count_sql("SELECT id FROM users LIMIT 5"),
        "SELECT COUNT(*) FROM (SELECT id FROM users LIMIT 5) tmp_count"
    );
}

#[test]
fn count_trims_statement_terminator() {
    assert_eq!(
        MySqlDialect.count_sql("  SELECT 1;\n"),
        "SELECT COUNT(*) FROM (SELECT 1) tmp_count"
    );
}

#[test]
fn sqlserver_count_drops_trailing_order_by() {
    assert_eq!(
        SqlServerDialect.count_sql(SQL),
        "SELECT COUNT(*) FROM (SELECT * FROM users WHERE age > ?) tmp_count"
    );
    assert_eq!(
        SqlServerDialect.count_sql("SELECT * FROM t ORDER BY a OFFSET 5 ROWS FETCH NEXT 5 ROWS ONLY"),
        "SELECT COUNT(*) FROM (SELECT * FROM t ORDER BY a OFFSET 5 ROWS FETCH NEXT 5 ROWS ONLY) tmp_count"
    );
}

#[test]
fn limit_templates() {
    assert_eq!(
        PostgresDialect.limit_sql(SQL, 20, 10).as_deref(),
        Some("SELECT * FROM users WHERE age > ? ORDER BY name LIMIT 10 OFFSET 20")
    );
    assert_eq!(
        PostgresDialect.limit_sql(SQL, 0, 10).as_deref(),
        Some("SELECT * FROM users WHERE age > ? ORDER BY name LIMIT 10")
    );
    assert_eq!(
        MySqlDialect.limit_sql(SQL, 20, 10).as_deref(),
        Some("SELECT * FROM users WHERE age > ? ORDER BY name LIMIT 20, 10")
    );
    assert_eq!(
        SqliteDialect.limit_sql("SELECT 1;", 5, 5).as_deref(),
        Some("SELECT 1 LIMIT 5 OFFSET 5")
    );
}

#[test]
fn oracle_limit_uses_rownum() {
    assert_eq!(
        OracleDialect.limit_sql("SELECT * FROM t", 0, 10).as_deref(),
        Some("SELECT * FROM (SELECT * FROM t) WHERE ROWNUM <= 10")
    );
    assert_eq!(
        OracleDialect.limit_sql("SELECT * FROM t", 20, 10).as_deref(),
        Some("SELECT * FROM (SELECT row_.*, ROWNUM rownum_ FROM (SELECT * FROM t) row_ WHERE ROWNUM <= 30) WHERE rownum_ > 20")
    );
}

#[test]
fn sqlserver_limit_requires_order_by() {
    assert_eq!(
        SqlServerDialect.limit_sql("SELECT * FROM t", 0, 10).as_deref(),
        Some("SELECT * FROM t ORDER BY (SELECT NULL) OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY")
    );
    assert_eq!(
        SqlServerDialect.limit_sql("SELECT * FROM t ORDER BY id", 10, 10).as_deref(),
        Some("SELECT * FROM t ORDER BY id OFFSET 10 ROWS FETCH NEXT 10 ROWS ONLY")
    );
}

#[test]
fn parses_dialect_names() {
    assert_eq!("PostgreSQL".parse::<DialectKind>().unwrap(), DialectKind::Postgres);
    assert_eq!("mariadb".parse::<DialectKind>().unwrap(), DialectKind::MySql);
    assert_eq!(" mssql ".parse::<DialectKind>().unwrap(), DialectKind::SqlServer);
    assert!("db2".parse::<DialectKind>().is_err());
    assert_eq!(DialectKind::Oracle.to_string(), "oracle");
}

const COMMENTED: &str = "SELECT * FROM users WHERE age > ? ; -- active users";

#[test]
fn count_sql_ignores_trailing_comment() {
    for dialect in [
        DialectKind::Postgres,
        DialectKind::MySql,
        DialectKind::Oracle,
        DialectKind::SqlServer,
        DialectKind::Sqlite,
        DialectKind::H2,
    ] {
        assert_eq!(
            dialect.dialect().count_sql(COMMENTED),
            "SELECT COUNT(*) FROM (SELECT * FROM users WHERE age > ?) tmp_count",
            "{dialect}"
        );
    }
    assert_eq!(
        PostgresDialect.count_sql("SELECT * FROM t /* all rows */"),
        "SELECT COUNT(*) FROM (SELECT * FROM t) tmp_count"
    );
}

#[test]
fn limit_sql_ignores_trailing_comment() {
    let base = "SELECT * FROM users WHERE age > ?";
    let expected = [
        (DialectKind::Postgres, format!("{base} LIMIT 10 OFFSET 10")),
        (DialectKind::Sqlite, format!("{base} LIMIT 10 OFFSET 10")),
        (DialectKind::H2, format!("{base} LIMIT 10 OFFSET 10")),
        (DialectKind::MySql, format!("{base} LIMIT 10, 10")),
        (
            DialectKind::Oracle,
            format!(
                "SELECT * FROM (SELECT row_.*, ROWNUM rownum_ FROM ({base}) row_ WHERE ROWNUM <= 20) WHERE rownum_ > 10"
            ),
        ),
        (
            DialectKind::SqlServer,
            format!("{base} ORDER BY (SELECT NULL) OFFSET 10 ROWS FETCH NEXT 10 ROWS ONLY"),
        ),
    ];
    for (dialect, sql) in expected {
        assert_eq!(dialect.dialect().limit_sql(COMMENTED, 10, 10), Some(sql), "{dialect}");
    }
}

#[test]
fn sqlserver_count_keeps_bracketed_keywords() {
    assert_eq!(
        SqlServerDialect.count_sql("SELECT [order], [by] FROM t"),
        "SELECT COUNT(*) FROM (SELECT [order], [by] FROM t) tmp_count"
    );
    assert_eq!(
        SqlServerDialect.count_sql("SELECT * FROM t -- newest first\nORDER BY id DESC"),
        "SELECT COUNT(*) FROM (SELECT * FROM t) tmp_count"
    );
}

#[derive(Debug)]
struct CountOnly;

impl Dialect for CountOnly {
    fn name(&self) -> &'static str {
        "count-only"
    }
}

#[test]
fn limit_sql_defaults_to_unsupported() {
    assert_eq!(CountOnly.limit_sql("SELECT 1", 0, 10), None);
    assert_eq!(CountOnly.count_sql("SELECT 1"), "SELECT COUNT(*) FROM (SELECT 1) tmp_count");
}
