use super::{SqlType, SqlValue, TypeHandler};
use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanHandler;

impl TypeHandler for BooleanHandler {
    fn name(&self) -> &'static str {
        "BooleanHandler"
    }

    fn to_sql_value(&self, index: usize, value: &Value, _: Option<SqlType>) -> OrmResult<SqlValue> {
        match value {
            Value::Bool(b) => Ok(SqlValue::Bool(*b)),
            other => Err(self.mismatch(index, other)),
        }
    }
}

/// `v` as a double, if the conversion loses no digits.
pub(crate) fn exact_f64(v: i64) -> Option<f64> {
    let f = v as f64;
    (f as i128 == i128::from(v)).then_some(f)
}

/// `v` as a single-precision float, if the conversion loses no digits.
pub(crate) fn exact_f32(v: i64) -> Option<f32> {
    let f = v as f32;
    (f as i128 == i128::from(v)).then_some(f)
}

fn inexact(index: usize, handler: &'static str, v: i64, target: &str) -> OrmError {
    OrmError::type_mismatch(index, handler, format!("{v} (not exactly representable as {target})"))
}

/// Integers, narrowed or widened to the declared wire type.
///
/// Without a declared type (or with `BigInt`) values are bound as 64-bit.
/// Conversions to `Real`/`Double` fail unless they are exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerHandler;

impl IntegerHandler {
    fn out_of_range(&self, index: usize, v: i64, target: &str) -> OrmError {
        OrmError::type_mismatch(index, self.name(), format!("{v} (out of range for {target})"))
    }
}

impl TypeHandler for IntegerHandler {
    fn name(&self) -> &'static str {
        "IntegerHandler"
    }

    fn to_sql_value(
        &self,
        index: usize,
        value: &Value,
        sql_type: Option<SqlType>,
    ) -> OrmResult<SqlValue> {
        let Value::Int(v) = *value else {
            return Err(self.mismatch(index, value));
        };
        Ok(match sql_type {
            Some(SqlType::SmallInt) => SqlValue::Int2(
                i16::try_from(v).map_err(|_| self.out_of_range(index, v, "smallint"))?,
            ),
            Some(SqlType::Integer) => SqlValue::Int4(
                i32::try_from(v).map_err(|_| self.out_of_range(index, v, "integer"))?,
            ),
            Some(SqlType::Real) => {
                SqlValue::Float4(exact_f32(v).ok_or_else(|| inexact(index, self.name(), v, "real"))?)
            }
            Some(SqlType::Double) => SqlValue::Float8(
                exact_f64(v).ok_or_else(|| inexact(index, self.name(), v, "double precision"))?,
            ),
            Some(SqlType::Varchar) => SqlValue::Text(v.to_string()),
            _ => SqlValue::Int8(v),
        })
    }
}

/// Floating point values; integers are accepted when they convert exactly.
///
/// Doubles bound as `Real` are rounded to single precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatHandler;

impl TypeHandler for FloatHandler {
    fn name(&self) -> &'static str {
        "FloatHandler"
    }

    fn to_sql_value(
        &self,
        index: usize,
        value: &Value,
        sql_type: Option<SqlType>,
    ) -> OrmResult<SqlValue> {
        Ok(match (value, sql_type) {
            (&Value::Float(f), Some(SqlType::Real)) => SqlValue::Float4(f as f32),
            (&Value::Float(f), _) => SqlValue::Float8(f),
            (&Value::Int(i), Some(SqlType::Real)) => {
                SqlValue::Float4(exact_f32(i).ok_or_else(|| inexact(index, self.name(), i, "real"))?)
            }
            (&Value::Int(i), _) => SqlValue::Float8(
                exact_f64(i).ok_or_else(|| inexact(index, self.name(), i, "double precision"))?,
            ),
            _ => return Err(self.mismatch(index, value)),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextHandler;

impl TypeHandler for TextHandler {
    fn name(&self) -> &'static str {
        "TextHandler"
    }

    fn to_sql_value(&self, index: usize, value: &Value, _: Option<SqlType>) -> OrmResult<SqlValue> {
        match value {
            Value::Text(s) => Ok(SqlValue::Text(s.clone())),
            other => Err(self.mismatch(index, other)),
        }
    }
}

/// Binary data. Lists of small integers (how serde renders `Vec<u8>`) are accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesHandler;

impl TypeHandler for BytesHandler {
    fn name(&self) -> &'static str {
        "BytesHandler"
    }

    fn to_sql_value(&self, index: usize, value: &Value, _: Option<SqlType>) -> OrmResult<SqlValue> {
        match value {
            Value::Bytes(b) => Ok(SqlValue::Bytea(b.clone())),
            Value::List(items) => items
                .iter()
                .map(|item| match *item {
                    Value::Int(i) => u8::try_from(i).ok(),
                    _ => None,
                })
                .collect::<Option<Vec<u8>>>()
                .map(SqlValue::Bytea)
                .ok_or_else(|| self.mismatch(index, value)),
            other => Err(self.mismatch(index, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DateHandler;

impl TypeHandler for DateHandler {
    fn name(&self) -> &'static str {
        "DateHandler"
    }

    fn to_sql_value(&self, index: usize, value: &Value, _: Option<SqlType>) -> OrmResult<SqlValue> {
        match value {
            Value::Date(d) => Ok(SqlValue::Date(*d)),
            Value::Text(s) => s
                .parse::<NaiveDate>()
                .map(SqlValue::Date)
                .map_err(|_| self.mismatch(index, value)),
            other => Err(self.mismatch(index, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampHandler;

impl TypeHandler for TimestampHandler {
    fn name(&self) -> &'static str {
        "TimestampHandler"
    }

    fn to_sql_value(&self, index: usize, value: &Value, _: Option<SqlType>) -> OrmResult<SqlValue> {
        match value {
            Value::Timestamp(ts) => Ok(SqlValue::Timestamp(*ts)),
            Value::Text(s) => s
                .parse::<NaiveDateTime>()
                .map(SqlValue::Timestamp)
                .map_err(|_| self.mismatch(index, value)),
            other => Err(self.mismatch(index, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampTzHandler;

impl TypeHandler for TimestampTzHandler {
    fn name(&self) -> &'static str {
        "TimestampTzHandler"
    }

    fn to_sql_value(&self, index: usize, value: &Value, _: Option<SqlType>) -> OrmResult<SqlValue> {
        match value {
            Value::TimestampTz(ts) => Ok(SqlValue::TimestampTz(*ts)),
            Value::Text(s) => s
                .parse::<DateTime<Utc>>()
                .map(SqlValue::TimestampTz)
                .map_err(|_| self.mismatch(index, value)),
            other => Err(self.mismatch(index, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidHandler;

impl TypeHandler for UuidHandler {
    fn name(&self) -> &'static str {
        "UuidHandler"
    }

    fn to_sql_value(&self, index: usize, value: &Value, _: Option<SqlType>) -> OrmResult<SqlValue> {
        match value {
            Value::Uuid(u) => Ok(SqlValue::Uuid(*u)),
            Value::Text(s) => Uuid::parse_str(s)
                .map(SqlValue::Uuid)
                .map_err(|_| self.mismatch(index, value)),
            other => Err(self.mismatch(index, other)),
        }
    }
}

/// JSON documents; records and lists are serialized as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonHandler;

impl TypeHandler for JsonHandler {
    fn name(&self) -> &'static str {
        "JsonHandler"
    }

    fn to_sql_value(&self, _: usize, value: &Value, _: Option<SqlType>) -> OrmResult<SqlValue> {
        Ok(match value {
            Value::Json(j) => SqlValue::Json(j.clone()),
            other => SqlValue::Json(other.to_json()),
        })
    }
}

/// Picks the wire representation from the runtime value.
///
/// Useful for mappings whose value type is not known when the statement is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicHandler;

impl TypeHandler for DynamicHandler {
    fn name(&self) -> &'static str {
        "DynamicHandler"
    }

    fn to_sql_value(
        &self,
        index: usize,
        value: &Value,
        sql_type: Option<SqlType>,
    ) -> OrmResult<SqlValue> {
        let delegate: &dyn TypeHandler = match value {
            Value::Null => return Ok(SqlValue::Null(sql_type)),
            Value::Bool(_) => &BooleanHandler,
            Value::Int(_) => &IntegerHandler,
            Value::Float(_) => &FloatHandler,
            Value::Text(_) => &TextHandler,
            Value::Bytes(_) => &BytesHandler,
            Value::Date(_) => &DateHandler,
            Value::Timestamp(_) => &TimestampHandler,
            Value::TimestampTz(_) => &TimestampTzHandler,
            Value::Uuid(_) => &UuidHandler,
            Value::Json(_) | Value::List(_) | Value::Record(_) => &JsonHandler,
        };
        delegate.to_sql_value(index, value, sql_type)
    }
}
