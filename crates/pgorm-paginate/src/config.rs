//! Shared configuration and statement context.

use crate::property::split_root;
use crate::type_handler::TypeHandlerRegistry;
use std::sync::Arc;

/// Default prefix of collection-iteration item placeholders (`__frch_item_0`).
pub const DEFAULT_FOREACH_ITEM_PREFIX: &str = "__frch_";

/// Naming convention for placeholders generated while expanding a collection.
///
/// A collection expansion stores each item as an additional parameter named
/// `<prefix><variable>_<n>` and references its properties as
/// `<prefix><variable>_<n>.<path>`. The root name is the part before the first
/// `.` or `[`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForEachConvention {
    item_prefix: String,
}

impl ForEachConvention {
    pub fn new(item_prefix: impl Into<String>) -> Self {
        Self {
            item_prefix: item_prefix.into(),
        }
    }

    pub fn item_prefix(&self) -> &str {
        &self.item_prefix
    }

    /// Split an iteration placeholder into `(item_name, remainder)`.
    ///
    /// Returns `None` when `property` does not use the prefix.
    pub fn split<'a>(&self, property: &'a str) -> Option<(&'a str, &'a str)> {
        if self.item_prefix.is_empty() || !property.starts_with(&self.item_prefix) {
            return None;
        }
        Some(split_root(property))
    }
}

impl Default for ForEachConvention {
    fn default() -> Self {
        Self::new(DEFAULT_FOREACH_ITEM_PREFIX)
    }
}

/// Configuration shared by all statements.
#[derive(Debug, Clone)]
pub struct Configuration {
    type_handlers: Arc<TypeHandlerRegistry>,
    foreach: ForEachConvention,
    max_sql_log_length: Option<usize>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            type_handlers: Arc::new(TypeHandlerRegistry::new()),
            foreach: ForEachConvention::default(),
            max_sql_log_length: Some(200),
        }
    }
}

impl Configuration {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the type handler registry.
    pub fn type_handlers(mut self, registry: TypeHandlerRegistry) -> Self {
        self.type_handlers = Arc::new(registry);
        self
    }

    /// Share an existing registry.
    pub fn shared_type_handlers(mut self, registry: Arc<TypeHandlerRegistry>) -> Self {
        self.type_handlers = registry;
        self
    }

    /// Set the collection-iteration placeholder prefix.
    pub fn foreach_item_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.foreach = ForEachConvention::new(prefix);
        self
    }

    /// Set maximum SQL length (in bytes) written to logs.
    pub fn max_sql_log_length(mut self, len: usize) -> Self {
        self.max_sql_log_length = Some(len);
        self
    }

    /// Log SQL untruncated.
    pub fn no_sql_truncate(mut self) -> Self {
        self.max_sql_log_length = None;
        self
    }

    pub fn type_handler_registry(&self) -> &TypeHandlerRegistry {
        &self.type_handlers
    }

    pub fn foreach_convention(&self) -> &ForEachConvention {
        &self.foreach
    }

    pub(crate) fn sql_for_log(&self, sql: &str) -> String {
        crate::sql::truncate_for_log(sql, self.max_sql_log_length)
    }
}

/// The statement being executed: its identifier and shared configuration.
#[derive(Debug, Clone)]
pub struct MappedStatement {
    id: String,
    parameter_map_id: Option<String>,
    configuration: Arc<Configuration>,
}

impl MappedStatement {
    pub fn new(id: impl Into<String>, configuration: Arc<Configuration>) -> Self {
        Self {
            id: id.into(),
            parameter_map_id: None,
            configuration,
        }
    }

    /// Associate the id of the parameter map used by this statement.
    pub fn with_parameter_map_id(mut self, id: impl Into<String>) -> Self {
        self.parameter_map_id = Some(id.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Parameter map id, defaulting to `<statement id>-Inline`.
    pub fn parameter_map_id(&self) -> String {
        match &self.parameter_map_id {
            Some(id) => id.clone(),
            None => format!("{}-Inline", self.id),
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }
}
