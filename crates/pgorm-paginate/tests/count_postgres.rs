//! Runs against a real database when `DATABASE_URL` is set; skipped otherwise.

use pgorm_paginate::{
    BoundSql, Configuration, MappedStatement, PageRequest, ParameterMapping, PgConnection,
    PostgresDialect, SqlType, TypeTag, Value, get_count, prepare_page,
};
use std::sync::Arc;

async fn try_connect() -> Option<tokio_postgres::Client> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

async fn seed(client: &tokio_postgres::Client) {
    client
        .batch_execute(
            "CREATE TEMP TABLE paginate_users (id serial PRIMARY KEY, name text NOT NULL, age int NOT NULL);
             INSERT INTO paginate_users (name, age) VALUES
                ('a', 12), ('b', 25), ('c', 31), ('d', 40), ('e', 45),
                ('f', 50), ('g', 62), ('h', 70), ('i', 81), ('j', 30);",
        )
        .await
        .unwrap();
}

fn age_query(config: &Configuration, min_age: i64) -> BoundSql {
    let age = ParameterMapping::builder("age")
        .value_type(TypeTag::Int)
        .sql_type(SqlType::Integer)
        .resolve(config.type_handler_registry());
    BoundSql::new(
        "SELECT * FROM paginate_users WHERE age > $1 ORDER BY id",
        vec![age],
        Some(Value::record([("age", min_age)])),
    )
}

#[tokio::test]
async fn counts_rows_in_postgres() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    seed(&client).await;

    let config = Arc::new(Configuration::new());
    let statement = MappedStatement::new("paginate_users.byAge", config.clone());
    let bound = age_query(&config, 30);
    let conn = PgConnection::new(&client);

    let total = get_count(
        bound.sql(),
        &conn,
        &statement,
        bound.parameter_object(),
        &bound,
        &PostgresDialect,
    )
    .await
    .unwrap();
    assert_eq!(total, 7);

    let none = age_query(&config, 100);
    let total = get_count(
        none.sql(),
        &conn,
        &statement,
        none.parameter_object(),
        &none,
        &PostgresDialect,
    )
    .await
    .unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn database_errors_propagate() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let config = Arc::new(Configuration::new());
    let statement = MappedStatement::new("missing.table", config);
    let bound = BoundSql::new("SELECT * FROM no_such_table_for_paginate", vec![], None);
    let err = get_count(
        bound.sql(),
        &PgConnection::new(&client),
        &statement,
        None,
        &bound,
        &PostgresDialect,
    )
    .await
    .unwrap_err();
    assert!(err.is_database_error());
}

#[tokio::test]
async fn prepares_page_in_postgres() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    seed(&client).await;

    let config = Arc::new(Configuration::new());
    let statement = MappedStatement::new("paginate_users.byAge", config.clone());
    let bound = age_query(&config, 30);
    let conn = PgConnection::new(&client);

    let page = prepare_page(
        &conn,
        &statement,
        &bound,
        &PostgresDialect,
        PageRequest::new(2, 5).unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(page.info.total_items, 7);
    assert_eq!(page.info.total_pages, 2);

    let rows = client
        .query(page.bound_sql.sql(), &[&30_i32])
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}
