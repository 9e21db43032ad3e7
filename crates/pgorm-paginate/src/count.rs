//! Total row count of an arbitrary query.

use crate::binder::set_parameters;
use crate::config::MappedStatement;
use crate::connection::{Connection, PreparedStatement, ResultCursor};
use crate::dialect::Dialect;
use crate::error::OrmResult;
use crate::mapping::BoundSql;
use crate::value::Value;

/// Count the rows `sql` would return.
///
/// The count SQL is derived with `dialect`, prepared on `connection` and bound
/// with the parameter mappings of `bound_sql`. Returns the first column of the
/// first row, or `0` when the query yields no row.
///
/// The statement and cursor are dropped (cursor first) on every exit path.
/// Database errors are returned unchanged.
///
/// # Example
///
/// ```ignore
/// let total = get_count(
///     bound.sql(),
///     &PgConnection::new(&client),
///     &statement,
///     bound.parameter_object(),
///     &bound,
///     &PostgresDialect,
/// )
/// .await?;
/// ```
pub async fn get_count<C: Connection>(
    sql: &str,
    connection: &C,
    statement: &MappedStatement,
    parameter_object: Option<&Value>,
    bound_sql: &BoundSql,
    dialect: &dyn Dialect,
) -> OrmResult<i64> {
    let count_sql = dialect.count_sql(sql);
    tracing::debug!(
        target: "pgorm_paginate.sql",
        statement = statement.id(),
        dialect = dialect.name(),
        sql = %statement.configuration().sql_for_log(&count_sql),
        "count sql"
    );

    let mut count_stmt = connection.prepare_statement(&count_sql).await?;
    let count_bound = bound_sql.with_sql(count_sql);
    set_parameters(&mut count_stmt, statement, &count_bound, parameter_object)?;

    let mut rows = count_stmt.execute_query().await?;
    let count = if rows.next_row().await? {
        rows.get_i64(1)?
    } else {
        0
    };
    Ok(count)
}
