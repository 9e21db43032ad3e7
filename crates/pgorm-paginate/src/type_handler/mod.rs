//! Marshalling strategies that write parameter values into statement slots.
//!
//! A [`TypeHandler`] turns a resolved [`Value`] into the wire representation
//! ([`SqlValue`]) for one placeholder and hands it to a [`ParameterSink`]
//! (usually a prepared statement). Handlers are looked up by
//! [`TypeTag`](crate::value::TypeTag) in a [`TypeHandlerRegistry`].

mod builtin;
mod registry;


pub use builtin::{
    BooleanHandler, BytesHandler, DateHandler, DynamicHandler, FloatHandler, IntegerHandler,
    JsonHandler, TextHandler, TimestampHandler, TimestampTzHandler, UuidHandler,
};
pub(crate) use builtin::{exact_f32, exact_f64};
pub use registry::TypeHandlerRegistry;

use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// Declared wire type of a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Varchar,
    Binary,
    Date,
    Timestamp,
    TimestampTz,
    Uuid,
    Json,
    Other,
}

/// A marshalled parameter value, ready to be sent to the database.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL, optionally carrying the declared wire type.
    Null(Option<SqlType>),
    Bool(bool),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float4(f32),
    Float8(f64),
    Text(String),
    Bytea(Vec<u8>),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null(_))
    }

    /// Read an integer wire value of any width.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            SqlValue::Int2(v) => Some(v.into()),
            SqlValue::Int4(v) => Some(v.into()),
            SqlValue::Int8(v) => Some(v),
            _ => None,
        }
    }
}

/// Destination for marshalled parameters. Positions are 1-based.
pub trait ParameterSink {
    /// Store `value` at parameter position `index`.
    fn bind(&mut self, index: usize, value: SqlValue) -> OrmResult<()>;

    /// Store a NULL at parameter position `index`.
    fn bind_null(&mut self, index: usize, sql_type: Option<SqlType>) -> OrmResult<()> {
        self.bind(index, SqlValue::Null(sql_type))
    }
}

/// A marshalling strategy for one family of values.
pub trait TypeHandler: Send + Sync + fmt::Debug {
    /// Handler name used in error messages.
    fn name(&self) -> &'static str;

    /// Convert a non-null value to its wire representation.
    ///
    /// `index` is only used for error reporting.
    fn to_sql_value(
        &self,
        index: usize,
        value: &Value,
        sql_type: Option<SqlType>,
    ) -> OrmResult<SqlValue>;

    /// Write `value` into `sink` at `index`. Nulls are written as typed NULLs.
    fn set_parameter(
        &self,
        sink: &mut dyn ParameterSink,
        index: usize,
        value: &Value,
        sql_type: Option<SqlType>,
    ) -> OrmResult<()> {
        if value.is_null() {
            return sink.bind_null(index, sql_type);
        }
        let wire = self.to_sql_value(index, value, sql_type)?;
        sink.bind(index, wire)
    }

    /// Shortcut for the mismatch error of this handler.
    fn mismatch(&self, index: usize, value: &Value) -> OrmError {
        OrmError::type_mismatch(index, self.name(), value.type_name())
    }
}

/// In-memory parameter slots, either fixed-size or growable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSlots {
    slots: Vec<Option<SqlValue>>,
    fixed: bool,
}

impl ParameterSlots {
    /// Slots that grow to fit any positive index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exactly `count` slots; binding past the end is an error.
    pub fn fixed(count: usize) -> Self {
        Self {
            slots: vec![None; count],
            fixed: true,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Value at 1-based position `index`, if bound.
    pub fn get(&self, index: usize) -> Option<&SqlValue> {
        index
            .checked_sub(1)
            .and_then(|i| self.slots.get(i))
            .and_then(Option::as_ref)
    }

    /// Iterate over all slots in position order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&SqlValue>> {
        self.slots.iter().map(Option::as_ref)
    }

    /// All values, failing on the first unbound position.
    pub fn bound_values(&self) -> OrmResult<Vec<&SqlValue>> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| slot.as_ref().ok_or(OrmError::UnboundParameter(i + 1)))
            .collect()
    }

    pub fn clear(&mut self) {
        if self.fixed {
            self.slots.iter_mut().for_each(|slot| *slot = None);
        } else {
            self.slots.clear();
        }
    }
}

impl ParameterSink for ParameterSlots {
    fn bind(&mut self, index: usize, value: SqlValue) -> OrmResult<()> {
        let count = self.slots.len();
        if index == 0 || (self.fixed && index > count) {
            return Err(OrmError::InvalidParameterIndex { index, count });
        }
        if index > count {
            self.slots.resize(index, None);
        }
        self.slots[index - 1] = Some(value);
        Ok(())
    }
}
