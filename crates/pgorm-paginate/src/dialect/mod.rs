//! Per-database SQL templates for counting and limiting queries.
//!
//! A [`Dialect`] never parses SQL: counting wraps the original statement in a
//! derived table, limiting appends (or wraps with) the product's paging
//! syntax.
//!
//! # Example
//!
//! ```ignore
//! use pgorm_paginate::dialect::{Dialect, PostgresDialect};
//!
//! let count = PostgresDialect.count_sql("SELECT * FROM users WHERE age > $1 ORDER BY id");
//! assert_eq!(
//!     count,
//!     "SELECT COUNT(*) FROM (SELECT * FROM users WHERE age > $1 ORDER BY id) tmp_count"
//! );
//! ```

#[cfg(test)]
mod tests;

use crate::error::{OrmError, OrmResult};
use crate::sql::{find_order_by, strip_trailing_order_by, trim_statement};
use std::fmt;
use std::str::FromStr;

/// Alias given to the derived table of count queries.
pub const COUNT_ALIAS: &str = "tmp_count";

/// SQL templating for one database product.
pub trait Dialect: Send + Sync + fmt::Debug {
    /// Product name, for logs.
    fn name(&self) -> &'static str;

    /// SQL returning the number of rows `sql` would return.
    fn count_sql(&self, sql: &str) -> String {
        wrap_count(trim_statement(sql))
    }

    /// SQL returning at most `limit` rows of `sql`, skipping `offset`.
    ///
    /// `None` when the product has no paging syntax.
    fn limit_sql(&self, _sql: &str, _offset: u64, _limit: u64) -> Option<String> {
        None
    }
}

fn wrap_count(sql: &str) -> String {
    format!("SELECT COUNT(*) FROM ({sql}) {COUNT_ALIAS}")
}

fn limit_offset(sql: &str, offset: u64, limit: u64) -> Option<String> {
    let sql = trim_statement(sql);
    Some(if offset == 0 {
        format!("{sql} LIMIT {limit}")
    } else {
        format!("{sql} LIMIT {limit} OFFSET {offset}")
    })
}

/// PostgreSQL: `LIMIT n OFFSET m`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn limit_sql(&self, sql: &str, offset: u64, limit: u64) -> Option<String> {
        limit_offset(sql, offset, limit)
    }
}

/// MySQL / MariaDB: `LIMIT m, n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn limit_sql(&self, sql: &str, offset: u64, limit: u64) -> Option<String> {
        let sql = trim_statement(sql);
        Some(if offset == 0 {
            format!("{sql} LIMIT {limit}")
        } else {
            format!("{sql} LIMIT {offset}, {limit}")
        })
    }
}

/// SQLite: `LIMIT n OFFSET m`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn limit_sql(&self, sql: &str, offset: u64, limit: u64) -> Option<String> {
        limit_offset(sql, offset, limit)
    }
}

/// H2: `LIMIT n OFFSET m`.
#[derive(Debug, Clone, Copy, Default)]
pub struct H2Dialect;

impl Dialect for H2Dialect {
    fn name(&self) -> &'static str {
        "h2"
    }

    fn limit_sql(&self, sql: &str, offset: u64, limit: u64) -> Option<String> {
        limit_offset(sql, offset, limit)
    }
}

/// Oracle: `ROWNUM` wrapping (works on every version).
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn limit_sql(&self, sql: &str, offset: u64, limit: u64) -> Option<String> {
        let sql = trim_statement(sql);
        let end = offset.saturating_add(limit);
        Some(if offset == 0 {
            format!("SELECT * FROM ({sql}) WHERE ROWNUM <= {end}")
        } else {
            format!(
                "SELECT * FROM (SELECT row_.*, ROWNUM rownum_ FROM ({sql}) row_ WHERE ROWNUM <= {end}) WHERE rownum_ > {offset}"
            )
        })
    }
}

/// SQL Server 2012+: `OFFSET .. ROWS FETCH NEXT .. ROWS ONLY`.
///
/// SQL Server rejects `ORDER BY` inside derived tables unless paging is
/// present, so count queries drop a trailing `ORDER BY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl Dialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn count_sql(&self, sql: &str) -> String {
        wrap_count(strip_trailing_order_by(trim_statement(sql)))
    }

    fn limit_sql(&self, sql: &str, offset: u64, limit: u64) -> Option<String> {
        let sql = trim_statement(sql);
        let order = if find_order_by(sql).is_some() {
            ""
        } else {
            " ORDER BY (SELECT NULL)"
        };
        Some(format!(
            "{sql}{order} OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY"
        ))
    }
}

/// Built-in dialects, parseable from product names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    Postgres,
    MySql,
    Oracle,
    SqlServer,
    Sqlite,
    H2,
}

impl DialectKind {
    /// The dialect implementation for this kind.
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            DialectKind::Postgres => &PostgresDialect,
            DialectKind::MySql => &MySqlDialect,
            DialectKind::Oracle => &OracleDialect,
            DialectKind::SqlServer => &SqlServerDialect,
            DialectKind::Sqlite => &SqliteDialect,
            DialectKind::H2 => &H2Dialect,
        }
    }
}

impl FromStr for DialectKind {
    type Err = OrmError;

    fn from_str(s: &str) -> OrmResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DialectKind::Postgres),
            "mysql" | "mariadb" => Ok(DialectKind::MySql),
            "oracle" => Ok(DialectKind::Oracle),
            "sqlserver" | "mssql" => Ok(DialectKind::SqlServer),
            "sqlite" => Ok(DialectKind::Sqlite),
            "h2" => Ok(DialectKind::H2),
            other => Err(OrmError::validation(format!("unknown dialect: {other}"))),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dialect().name())
    }
}
