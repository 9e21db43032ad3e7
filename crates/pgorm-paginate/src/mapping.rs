//! Parameter mappings and bound SQL.

use crate::type_handler::{SqlType, TypeHandler, TypeHandlerRegistry};
use crate::value::{TypeTag, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Binding direction of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterMode {
    #[default]
    In,
    /// Output-only parameters are skipped when binding inputs.
    Out,
    InOut,
}

/// Describes how one placeholder binds to a value.
#[derive(Clone)]
pub struct ParameterMapping {
    property: String,
    mode: ParameterMode,
    value_type: Option<TypeTag>,
    sql_type: Option<SqlType>,
    type_handler: Option<Arc<dyn TypeHandler>>,
}

impl ParameterMapping {
    /// An input mapping using `handler`.
    pub fn new<H: TypeHandler + 'static>(property: impl Into<String>, handler: H) -> Self {
        Self {
            property: property.into(),
            mode: ParameterMode::In,
            value_type: None,
            sql_type: None,
            type_handler: Some(Arc::new(handler)),
        }
    }

    /// Start building a mapping for `property`.
    pub fn builder(property: impl Into<String>) -> ParameterMappingBuilder {
        ParameterMappingBuilder {
            mapping: Self {
                property: property.into(),
                mode: ParameterMode::In,
                value_type: None,
                sql_type: None,
                type_handler: None,
            },
        }
    }

    /// Property name or path (`name`, `user.address.city`, `__frch_item_0.id`).
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn mode(&self) -> ParameterMode {
        self.mode
    }

    pub fn value_type(&self) -> Option<TypeTag> {
        self.value_type
    }

    pub fn sql_type(&self) -> Option<SqlType> {
        self.sql_type
    }

    pub fn type_handler(&self) -> Option<&Arc<dyn TypeHandler>> {
        self.type_handler.as_ref()
    }
}

impl fmt::Debug for ParameterMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterMapping")
            .field("property", &self.property)
            .field("mode", &self.mode)
            .field("value_type", &self.value_type)
            .field("sql_type", &self.sql_type)
            .field("type_handler", &self.type_handler.as_ref().map(|h| h.name()))
            .finish()
    }
}

/// Builder for [`ParameterMapping`].
#[must_use]
pub struct ParameterMappingBuilder {
    mapping: ParameterMapping,
}

impl ParameterMappingBuilder {
    pub fn mode(mut self, mode: ParameterMode) -> Self {
        self.mapping.mode = mode;
        self
    }

    /// Declared value type; used to look up a handler when none is set.
    pub fn value_type(mut self, tag: TypeTag) -> Self {
        self.mapping.value_type = Some(tag);
        self
    }

    /// Declared wire type passed to the handler.
    pub fn sql_type(mut self, sql_type: SqlType) -> Self {
        self.mapping.sql_type = Some(sql_type);
        self
    }

    pub fn type_handler<H: TypeHandler + 'static>(mut self, handler: H) -> Self {
        self.mapping.type_handler = Some(Arc::new(handler));
        self
    }

    pub fn type_handler_arc(mut self, handler: Arc<dyn TypeHandler>) -> Self {
        self.mapping.type_handler = Some(handler);
        self
    }

    /// Finish without consulting a registry.
    pub fn build(self) -> ParameterMapping {
        self.mapping
    }

    /// Finish, resolving a missing handler from `registry` by value type.
    ///
    /// If no handler can be found the mapping is still built; binding it will
    /// fail with [`OrmError::MissingTypeHandler`](crate::OrmError::MissingTypeHandler).
    pub fn resolve(mut self, registry: &TypeHandlerRegistry) -> ParameterMapping {
        if self.mapping.type_handler.is_none() {
            self.mapping.type_handler = self.mapping.value_type.and_then(|tag| registry.get(tag));
        }
        self.mapping
    }
}

/// Final SQL text paired with its parameter mappings and additional parameters.
#[derive(Debug, Clone)]
pub struct BoundSql {
    sql: String,
    parameter_mappings: Vec<ParameterMapping>,
    parameter_object: Option<Value>,
    additional_parameters: BTreeMap<String, Value>,
}

impl BoundSql {
    pub fn new(
        sql: impl Into<String>,
        parameter_mappings: Vec<ParameterMapping>,
        parameter_object: Option<Value>,
    ) -> Self {
        Self {
            sql: sql.into(),
            parameter_mappings,
            parameter_object,
            additional_parameters: BTreeMap::new(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameter_mappings(&self) -> &[ParameterMapping] {
        &self.parameter_mappings
    }

    pub fn parameter_object(&self) -> Option<&Value> {
        self.parameter_object.as_ref()
    }

    /// Add an additional named parameter (builder style).
    pub fn with_additional_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_additional_parameter(name, value);
        self
    }

    pub fn set_additional_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.additional_parameters.insert(name.into(), value.into());
    }

    /// Exact-name lookup.
    pub fn has_additional_parameter(&self, name: &str) -> bool {
        self.additional_parameters.contains_key(name)
    }

    pub fn additional_parameter(&self, name: &str) -> Option<&Value> {
        self.additional_parameters.get(name)
    }

    pub fn additional_parameters(&self) -> &BTreeMap<String, Value> {
        &self.additional_parameters
    }

    /// The same mappings and parameters against different SQL text.
    pub fn with_sql(&self, sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            parameter_mappings: self.parameter_mappings.clone(),
            parameter_object: self.parameter_object.clone(),
            additional_parameters: self.additional_parameters.clone(),
        }
    }
}
