//! Database access used by the count query.
//!
//! Statements and cursors are released when dropped, so every exit path of a
//! caller (including `?` on an error) closes them.

use crate::error::OrmResult;
use crate::type_handler::ParameterSink;
use std::future::Future;

/// A connection that can prepare statements.
pub trait Connection: Send + Sync {
    type Statement: PreparedStatement;

    /// Prepare `sql` on this connection.
    fn prepare_statement(
        &self,
        sql: &str,
    ) -> impl Future<Output = OrmResult<Self::Statement>> + Send;
}

/// A prepared statement whose parameters are written through [`ParameterSink`].
pub trait PreparedStatement: ParameterSink + Send {
    type Cursor: ResultCursor;

    /// Execute the statement with the currently bound parameters.
    fn execute_query(&mut self) -> impl Future<Output = OrmResult<Self::Cursor>> + Send;
}

/// Forward-only cursor over a query result.
pub trait ResultCursor: Send {
    /// Advance to the next row; `false` when exhausted.
    fn next_row(&mut self) -> impl Future<Output = OrmResult<bool>> + Send;

    /// Integer value of the current row at 1-based `column`.
    fn get_i64(&self, column: usize) -> OrmResult<i64>;
}
