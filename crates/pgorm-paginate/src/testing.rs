//! In-memory connection that tracks open statements and cursors.

use crate::connection::{Connection, PreparedStatement, ResultCursor};
use crate::error::{OrmError, OrmResult};
use crate::type_handler::{ParameterSink, ParameterSlots, SqlValue};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Executor =
    dyn Fn(&str, &[Option<SqlValue>]) -> OrmResult<Vec<Vec<SqlValue>>> + Send + Sync;

#[derive(Debug, Default)]
struct Counters {
    open_statements: AtomicUsize,
    open_cursors: AtomicUsize,
    prepared: AtomicUsize,
    executed: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct HandleTracker(Arc<Counters>);

impl HandleTracker {
    pub fn open_handles(&self) -> usize {
        self.0.open_statements.load(Ordering::SeqCst) + self.0.open_cursors.load(Ordering::SeqCst)
    }

    pub fn statements_prepared(&self) -> usize {
        self.0.prepared.load(Ordering::SeqCst)
    }

    pub fn queries_executed(&self) -> usize {
        self.0.executed.load(Ordering::SeqCst)
    }
}

pub(crate) struct FakeConnection {
    tracker: HandleTracker,
    executor: Arc<Executor>,
    prepare_error: Option<String>,
    prepared_sql: Mutex<Vec<String>>,
}

impl FakeConnection {
    /// `executor` receives the SQL and bound slots and returns result rows.
    pub fn new<F>(executor: F) -> Self
    where
        F: Fn(&str, &[Option<SqlValue>]) -> OrmResult<Vec<Vec<SqlValue>>> + Send + Sync + 'static,
    {
        Self {
            tracker: HandleTracker::default(),
            executor: Arc::new(executor),
            prepare_error: None,
            prepared_sql: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_prepare(message: &str) -> Self {
        let mut conn = Self::new(|_, _| Ok(vec![]));
        conn.prepare_error = Some(message.to_string());
        conn
    }

    pub fn tracker(&self) -> &HandleTracker {
        &self.tracker
    }

    pub fn prepared_sql(&self) -> Vec<String> {
        self.prepared_sql
            .lock()
            .map(|sqls| sqls.clone())
            .unwrap_or_default()
    }
}

impl Connection for FakeConnection {
    type Statement = FakeStatement;

    async fn prepare_statement(&self, sql: &str) -> OrmResult<FakeStatement> {
        if let Some(message) = &self.prepare_error {
            return Err(OrmError::Other(message.clone()));
        }
        if let Ok(mut sqls) = self.prepared_sql.lock() {
            sqls.push(sql.to_string());
        }
        let counters = &self.tracker.0;
        counters.prepared.fetch_add(1, Ordering::SeqCst);
        counters.open_statements.fetch_add(1, Ordering::SeqCst);
        Ok(FakeStatement {
            sql: sql.to_string(),
            slots: ParameterSlots::new(),
            tracker: self.tracker.clone(),
            executor: self.executor.clone(),
        })
    }
}

pub(crate) struct FakeStatement {
    sql: String,
    slots: ParameterSlots,
    tracker: HandleTracker,
    executor: Arc<Executor>,
}

impl ParameterSink for FakeStatement {
    fn bind(&mut self, index: usize, value: SqlValue) -> OrmResult<()> {
        self.slots.bind(index, value)
    }
}

impl PreparedStatement for FakeStatement {
    type Cursor = FakeCursor;

    async fn execute_query(&mut self) -> OrmResult<FakeCursor> {
        self.tracker.0.executed.fetch_add(1, Ordering::SeqCst);
        let params: Vec<Option<SqlValue>> = self.slots.iter().map(|v| v.cloned()).collect();
        let rows = (self.executor)(&self.sql, &params)?;
        self.tracker.0.open_cursors.fetch_add(1, Ordering::SeqCst);
        Ok(FakeCursor {
            rows: rows.into(),
            current: None,
            tracker: self.tracker.clone(),
        })
    }
}

impl Drop for FakeStatement {
    fn drop(&mut self) {
        self.tracker.0.open_statements.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(crate) struct FakeCursor {
    rows: VecDeque<Vec<SqlValue>>,
    current: Option<Vec<SqlValue>>,
    tracker: HandleTracker,
}

impl ResultCursor for FakeCursor {
    async fn next_row(&mut self) -> OrmResult<bool> {
        self.current = self.rows.pop_front();
        Ok(self.current.is_some())
    }

    fn get_i64(&self, column: usize) -> OrmResult<i64> {
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| OrmError::Other("no current row".into()))?;
        column
            .checked_sub(1)
            .and_then(|i| row.get(i))
            .and_then(SqlValue::as_i64)
            .ok_or_else(|| OrmError::decode(column.to_string(), "expected an integer"))
    }
}

impl Drop for FakeCursor {
    fn drop(&mut self) {
        self.tracker.0.open_cursors.fetch_sub(1, Ordering::SeqCst);
    }
}
