use super::builtin::*;
use super::TypeHandler;
use crate::value::TypeTag;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maps value types to marshalling strategies.
///
/// The registry is built once and then shared read-only (usually behind an
/// `Arc` inside [`Configuration`](crate::Configuration)).
#[derive(Clone)]
pub struct TypeHandlerRegistry {
    handlers: HashMap<TypeTag, Arc<dyn TypeHandler>>,
}

impl TypeHandlerRegistry {
    /// A registry with handlers for every scalar type.
    ///
    /// Lists and records have no handler, so they are treated as composite
    /// parameter objects whose properties are bound individually.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry
            .register(TypeTag::Bool, BooleanHandler)
            .register(TypeTag::Int, IntegerHandler)
            .register(TypeTag::Float, FloatHandler)
            .register(TypeTag::Text, TextHandler)
            .register(TypeTag::Bytes, BytesHandler)
            .register(TypeTag::Date, DateHandler)
            .register(TypeTag::Timestamp, TimestampHandler)
            .register(TypeTag::TimestampTz, TimestampTzHandler)
            .register(TypeTag::Uuid, UuidHandler)
            .register(TypeTag::Json, JsonHandler);
        registry
    }

    /// A registry without any handlers.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register (or replace) the handler for `tag`.
    pub fn register<H: TypeHandler + 'static>(&mut self, tag: TypeTag, handler: H) -> &mut Self {
        self.handlers.insert(tag, Arc::new(handler));
        self
    }

    /// Register a shared handler for `tag`.
    pub fn register_arc(&mut self, tag: TypeTag, handler: Arc<dyn TypeHandler>) -> &mut Self {
        self.handlers.insert(tag, handler);
        self
    }

    /// Remove the handler for `tag`.
    pub fn unregister(&mut self, tag: TypeTag) -> Option<Arc<dyn TypeHandler>> {
        self.handlers.remove(&tag)
    }

    pub fn has_type_handler(&self, tag: TypeTag) -> bool {
        self.handlers.contains_key(&tag)
    }

    /// Exact-type lookup.
    pub fn get(&self, tag: TypeTag) -> Option<Arc<dyn TypeHandler>> {
        self.handlers.get(&tag).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for TypeHandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeHandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.handlers.keys().collect();
        tags.sort();
        f.debug_struct("TypeHandlerRegistry")
            .field("types", &tags)
            .finish()
    }
}
