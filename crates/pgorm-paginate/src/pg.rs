//! tokio-postgres backed [`Connection`].
//!
//! Works with anything implementing [`tokio_postgres::GenericClient`], so a
//! count can run inside a transaction.
//!
//! ```ignore
//! let conn = PgConnection::new(&client);
//! let total = get_count(sql, &conn, &statement, source, &bound, &PostgresDialect).await?;
//! ```

use crate::connection::{Connection, PreparedStatement, ResultCursor};
use crate::error::{OrmError, OrmResult};
use crate::type_handler::{ParameterSink, ParameterSlots, SqlValue, exact_f32, exact_f64};
use bytes::BytesMut;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type};
use tokio_postgres::{GenericClient, Row, Statement};

/// A borrowed tokio-postgres client.
pub struct PgConnection<'a, C> {
    client: &'a C,
}

impl<'a, C> PgConnection<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }
}

impl<'a, C> Connection for PgConnection<'a, C>
where
    C: GenericClient + Sync,
{
    type Statement = PgStatement<'a, C>;

    async fn prepare_statement(&self, sql: &str) -> OrmResult<PgStatement<'a, C>> {
        let statement = self.client.prepare(sql).await?;
        let slots = ParameterSlots::fixed(statement.params().len());
        Ok(PgStatement {
            client: self.client,
            statement,
            slots,
        })
    }
}

/// A statement prepared on a [`PgConnection`].
///
/// Integer and float values are coerced to the parameter types the server
/// inferred for the statement.
pub struct PgStatement<'a, C> {
    client: &'a C,
    statement: Statement,
    slots: ParameterSlots,
}

impl<C> PgStatement<'_, C> {
    pub fn statement(&self) -> &Statement {
        &self.statement
    }
}

impl<C> ParameterSink for PgStatement<'_, C> {
    fn bind(&mut self, index: usize, value: SqlValue) -> OrmResult<()> {
        let value = match index.checked_sub(1).and_then(|i| self.statement.params().get(i)) {
            Some(ty) => coerce(index, value, ty)?,
            None => value,
        };
        self.slots.bind(index, value)
    }
}

impl<'a, C> PreparedStatement for PgStatement<'a, C>
where
    C: GenericClient + Sync,
{
    type Cursor = PgCursor;

    async fn execute_query(&mut self) -> OrmResult<PgCursor> {
        let values = self.slots.bound_values()?;
        let params: Vec<&(dyn ToSql + Sync)> = values.iter().map(|v| *v as _).collect();
        let rows = self.client.query(&self.statement, &params).await?;
        Ok(PgCursor {
            rows: rows.into_iter(),
            current: None,
        })
    }
}

/// Buffered result rows of a [`PgStatement`].
pub struct PgCursor {
    rows: std::vec::IntoIter<Row>,
    current: Option<Row>,
}

impl ResultCursor for PgCursor {
    async fn next_row(&mut self) -> OrmResult<bool> {
        self.current = self.rows.next();
        Ok(self.current.is_some())
    }

    fn get_i64(&self, column: usize) -> OrmResult<i64> {
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| OrmError::Other("no current row".to_string()))?;
        let idx = column
            .checked_sub(1)
            .ok_or_else(|| OrmError::decode("0", "columns are 1-based"))?;
        let value = match row.columns().get(idx).map(|c| c.type_().clone()) {
            Some(Type::INT2) => row.try_get::<_, i16>(idx).map(i64::from),
            Some(Type::INT4) => row.try_get::<_, i32>(idx).map(i64::from),
            _ => row.try_get::<_, i64>(idx),
        };
        value.map_err(|e| OrmError::decode(column.to_string(), e.to_string()))
    }
}

/// Adapt numeric wire values to the server-side parameter type.
fn coerce(index: usize, value: SqlValue, ty: &Type) -> OrmResult<SqlValue> {
    let out_of_range = |v: i64| {
        OrmError::type_mismatch(index, "PgStatement", format!("{v} (out of range for {ty})"))
    };
    let inexact = |v: i64| {
        OrmError::type_mismatch(index, "PgStatement", format!("{v} (not exact as {ty})"))
    };
    Ok(match (value, ty) {
        (v, ty) if !is_numeric(ty) => v,
        (SqlValue::Null(t), _) => SqlValue::Null(t),
        (v @ (SqlValue::Int2(_) | SqlValue::Int4(_) | SqlValue::Int8(_)), ty) => {
            let n = v.as_i64().unwrap_or_default();
            match *ty {
                Type::INT2 => SqlValue::Int2(i16::try_from(n).map_err(|_| out_of_range(n))?),
                Type::INT4 => SqlValue::Int4(i32::try_from(n).map_err(|_| out_of_range(n))?),
                Type::INT8 => SqlValue::Int8(n),
                Type::FLOAT4 => SqlValue::Float4(exact_f32(n).ok_or_else(|| inexact(n))?),
                _ => SqlValue::Float8(exact_f64(n).ok_or_else(|| inexact(n))?),
            }
        }
        (SqlValue::Float4(f), &Type::FLOAT8) => SqlValue::Float8(f.into()),
        (SqlValue::Float8(f), &Type::FLOAT4) => SqlValue::Float4(f as f32),
        (v, _) => v,
    })
}

fn is_numeric(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::INT2 | Type::INT4 | Type::INT8 | Type::FLOAT4 | Type::FLOAT8
    )
}

impl ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlValue::Null(_) => Ok(IsNull::Yes),
            SqlValue::Bool(v) => v.to_sql_checked(ty, out),
            SqlValue::Int2(v) => v.to_sql_checked(ty, out),
            SqlValue::Int4(v) => v.to_sql_checked(ty, out),
            SqlValue::Int8(v) => v.to_sql_checked(ty, out),
            SqlValue::Float4(v) => v.to_sql_checked(ty, out),
            SqlValue::Float8(v) => v.to_sql_checked(ty, out),
            SqlValue::Text(v) => v.to_sql_checked(ty, out),
            SqlValue::Bytea(v) => v.to_sql_checked(ty, out),
            SqlValue::Date(v) => v.to_sql_checked(ty, out),
            SqlValue::Timestamp(v) => v.to_sql_checked(ty, out),
            SqlValue::TimestampTz(v) => v.to_sql_checked(ty, out),
            SqlValue::Uuid(v) => v.to_sql_checked(ty, out),
            SqlValue::Json(v) => v.to_sql_checked(ty, out),
        }
    }

    // Each variant checks its own type in `to_sql`.
    fn accepts(_: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}
