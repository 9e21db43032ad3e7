//! # pgorm-paginate
//!
//! Pagination helpers for a SQL statement pipeline.
//!
//! ## Features
//!
//! - **Count derivation**: `get_count` wraps any query in a dialect-specific
//!   count query and reads back the total
//! - **Typed parameter binding**: `set_parameters` resolves mapped properties
//!   from a parameter object and marshals them through type handlers
//! - **Dialects**: PostgreSQL, MySQL, Oracle, SQL Server, SQLite and H2
//!   templates for counting and LIMIT/OFFSET
//! - **tokio-postgres adapter**: run counts on a client or a transaction
//!
//! ## Example
//!
//! ```ignore
//! use pgorm_paginate::{
//!     get_count, BoundSql, Configuration, MappedStatement, ParameterMapping, PgConnection,
//!     PostgresDialect, SqlType, TypeTag, Value,
//! };
//! use std::sync::Arc;
//!
//! let config = Arc::new(Configuration::new());
//! let statement = MappedStatement::new("users.byAge", config.clone());
//! let age = ParameterMapping::builder("age")
//!     .value_type(TypeTag::Int)
//!     .sql_type(SqlType::Integer)
//!     .resolve(config.type_handler_registry());
//!
//! let source = Value::record([("age", 30_i64)]);
//! let bound = BoundSql::new("SELECT * FROM users WHERE age > $1", vec![age], Some(source));
//!
//! let total = get_count(
//!     bound.sql(),
//!     &PgConnection::new(&client),
//!     &statement,
//!     bound.parameter_object(),
//!     &bound,
//!     &PostgresDialect,
//! )
//! .await?;
//! ```

pub mod binder;
pub mod config;
pub mod connection;
pub mod count;
pub mod dialect;
pub mod error;
pub mod mapping;
pub mod page;
pub mod pg;
pub mod property;
pub mod type_handler;
pub mod value;

mod sql;

#[cfg(test)]
mod testing;

pub use binder::{resolve_value, set_parameters};
pub use config::{Configuration, ForEachConvention, MappedStatement};
pub use connection::{Connection, PreparedStatement, ResultCursor};
pub use count::get_count;
pub use dialect::{
    Dialect, DialectKind, H2Dialect, MySqlDialect, OracleDialect, PostgresDialect,
    SqlServerDialect, SqliteDialect,
};
pub use error::{OrmError, OrmResult};
pub use mapping::{BoundSql, ParameterMapping, ParameterMappingBuilder, ParameterMode};
pub use page::{PageInfo, PageRequest, PreparedPage, prepare_page};
pub use pg::{PgConnection, PgCursor, PgStatement};
pub use property::PropertyPath;
pub use type_handler::{
    ParameterSink, ParameterSlots, SqlType, SqlValue, TypeHandler, TypeHandlerRegistry,
};
pub use value::{TypeTag, Value};
