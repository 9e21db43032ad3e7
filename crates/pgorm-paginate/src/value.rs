//! Parameter source values.
//!
//! [`Value`] is the structured tree parameters are resolved from. Application
//! types reach it through `serde` (see [`Value::from_serialize`]), so property
//! lookup is a path walk over records and lists rather than reflection.

use crate::error::OrmResult;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// A parameter value: a scalar, a list, or a record of named fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Uuid(Uuid),
    /// An opaque JSON document, bound as a single json/jsonb value.
    Json(serde_json::Value),
    List(Vec<Value>),
    Record(BTreeMap<String, Value>),
}

/// Type tag of a non-null [`Value`], used as the type handler registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Bool,
    Int,
    Float,
    Text,
    Bytes,
    Date,
    Timestamp,
    TimestampTz,
    Uuid,
    Json,
    List,
    Record,
}

impl TypeTag {
    /// Whether values of this type are composites (lists or records).
    pub fn is_composite(self) -> bool {
        matches!(self, TypeTag::List | TypeTag::Record)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Text => "text",
            TypeTag::Bytes => "bytes",
            TypeTag::Date => "date",
            TypeTag::Timestamp => "timestamp",
            TypeTag::TimestampTz => "timestamptz",
            TypeTag::Uuid => "uuid",
            TypeTag::Json => "json",
            TypeTag::List => "list",
            TypeTag::Record => "record",
        };
        f.write_str(name)
    }
}

pub(crate) static NULL: Value = Value::Null;

impl Value {
    /// Convert any serializable value into a `Value` tree.
    ///
    /// Structs and maps become records, sequences become lists. Dates, uuids and
    /// other types that serialize as strings arrive as `Value::Text`; type
    /// handlers parse them back where the target wire type requires it.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> OrmResult<Self> {
        Ok(Self::from_json(serde_json::to_value(value)?))
    }

    /// Convert a JSON document into a structured `Value` tree.
    ///
    /// Unsigned integers above `i64::MAX` become `Value::Text` holding their
    /// exact decimal digits.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Value::Int(i),
                (None, Some(u)) => Value::Text(u.to_string()),
                (None, None) => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(fields) => Value::Record(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Wrap a JSON document as an opaque `Value::Json`.
    pub fn json(json: serde_json::Value) -> Self {
        Value::Json(json)
    }

    /// Build a record from `(name, value)` pairs.
    pub fn record<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a list from values.
    pub fn list<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The type tag of this value, `None` for `Null`.
    pub fn type_tag(&self) -> Option<TypeTag> {
        let tag = match self {
            Value::Null => return None,
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Text(_) => TypeTag::Text,
            Value::Bytes(_) => TypeTag::Bytes,
            Value::Date(_) => TypeTag::Date,
            Value::Timestamp(_) => TypeTag::Timestamp,
            Value::TimestampTz(_) => TypeTag::TimestampTz,
            Value::Uuid(_) => TypeTag::Uuid,
            Value::Json(_) => TypeTag::Json,
            Value::List(_) => TypeTag::List,
            Value::Record(_) => TypeTag::Record,
        };
        Some(tag)
    }

    /// Short type name for error messages.
    pub fn type_name(&self) -> String {
        match self.type_tag() {
            Some(tag) => tag.to_string(),
            None => "null".to_string(),
        }
    }

    /// Look up a field of a record.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Look up an element of a list.
    pub fn element(&self, index: usize) -> Option<&Value> {
        match self {
            Value::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Convert back into a JSON document.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as J;
        match self {
            Value::Null => J::Null,
            Value::Bool(b) => J::Bool(*b),
            Value::Int(i) => J::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f).map_or(J::Null, J::Number),
            Value::Text(s) => J::String(s.clone()),
            Value::Bytes(b) => J::Array(b.iter().map(|x| J::from(*x)).collect()),
            Value::Date(d) => J::String(d.to_string()),
            Value::Timestamp(ts) => J::String(ts.to_string()),
            Value::TimestampTz(ts) => J::String(ts.to_rfc3339()),
            Value::Uuid(u) => J::String(u.to_string()),
            Value::Json(j) => j.clone(),
            Value::List(items) => J::Array(items.iter().map(Value::to_json).collect()),
            Value::Record(fields) => J::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v $(as $cast)?)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int,
    f32 => Float as f64,
    f64 => Float,
    String => Text,
    NaiveDate => Date,
    NaiveDateTime => Timestamp,
    DateTime<Utc> => TimestampTz,
    Uuid => Uuid,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::from_json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::list(v)
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(v: BTreeMap<String, T>) -> Self {
        Value::Record(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}
