//! Error types for pgorm-paginate

use thiserror::Error;

/// Result type alias for pagination operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for count derivation and parameter binding
#[derive(Debug, Error)]
pub enum OrmError {
    /// Query execution error, propagated from the driver unchanged
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// A parameter mapping has no marshalling strategy (statement configuration defect)
    #[error("There was no TypeHandler found for parameter {property} of statement {statement}")]
    MissingTypeHandler { property: String, statement: String },

    /// A type handler was given a value it cannot marshal
    #[error("Type mismatch for parameter #{index}: {handler} cannot bind {found}")]
    TypeMismatch {
        index: usize,
        handler: &'static str,
        found: String,
    },

    /// Parameter positions are 1-based and bounded by the statement
    #[error("Invalid parameter index {index} (statement has {count} parameters)")]
    InvalidParameterIndex { index: usize, count: usize },

    /// A statement was executed with an unset parameter slot
    #[error("No value specified for parameter #{0}")]
    UnboundParameter(usize),

    /// Malformed property path
    #[error("Invalid property path '{path}': {message}")]
    InvalidPropertyPath { path: String, message: String },

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a missing type handler error for a parameter of a statement
    pub fn missing_type_handler(property: impl Into<String>, statement: impl Into<String>) -> Self {
        Self::MissingTypeHandler {
            property: property.into(),
            statement: statement.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(index: usize, handler: &'static str, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            index,
            handler,
            found: found.into(),
        }
    }

    /// Create an invalid property path error
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPropertyPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this error signals a statement configuration defect
    pub fn is_configuration_defect(&self) -> bool {
        matches!(self, Self::MissingTypeHandler { .. })
    }

    /// Check if this error came from the database driver
    pub fn is_database_error(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
