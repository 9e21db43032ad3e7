//! Binding parameter values into prepared statements.
//!
//! [`set_parameters`] walks the parameter mappings of a [`BoundSql`] in order,
//! resolves each value from the parameter object and hands it to the mapping's
//! [`TypeHandler`](crate::type_handler::TypeHandler).


use crate::config::MappedStatement;
use crate::error::{OrmError, OrmResult};
use crate::mapping::{BoundSql, ParameterMode};
use crate::property::PropertyPath;
use crate::type_handler::ParameterSink;
use crate::value::{NULL, Value};

/// Bind every non-output parameter of `bound_sql` into `sink`.
///
/// Parameter `i` of the mapping list is written at position `i + 1`; output
/// parameters keep their position but are not written.
///
/// # Errors
///
/// - [`OrmError::MissingTypeHandler`] when a mapping has no handler. This is
///   checked before the property is resolved.
/// - [`OrmError::InvalidPropertyPath`] for malformed property names.
/// - Any error raised by a handler or the sink.
pub fn set_parameters(
    sink: &mut dyn ParameterSink,
    statement: &MappedStatement,
    bound_sql: &BoundSql,
    parameter_object: Option<&Value>,
) -> OrmResult<()> {
    let _span = tracing::debug_span!(
        "setting parameters",
        statement = statement.id(),
        parameter_map = %statement.parameter_map_id(),
    )
    .entered();

    for (i, mapping) in bound_sql.parameter_mappings().iter().enumerate() {
        if mapping.mode() == ParameterMode::Out {
            continue;
        }
        let property = mapping.property();
        let handler = mapping
            .type_handler()
            .ok_or_else(|| OrmError::missing_type_handler(property, statement.id()))?;
        let value = resolve_value(statement, bound_sql, parameter_object, property)?;
        handler.set_parameter(sink, i + 1, value, mapping.sql_type())?;
    }
    Ok(())
}

/// Resolve the value bound to `property`.
///
/// Precedence:
/// 1. null when there is no parameter object;
/// 2. the parameter object itself when its type has a handler (a scalar);
/// 3. the additional parameter named exactly `property`;
/// 4. for iteration placeholders, the remainder of the path resolved against
///    the additional parameter named by the root;
/// 5. the property path resolved against the parameter object.
///
/// Absent values resolve to [`Value::Null`].
pub fn resolve_value<'a>(
    statement: &MappedStatement,
    bound_sql: &'a BoundSql,
    parameter_object: Option<&'a Value>,
    property: &str,
) -> OrmResult<&'a Value> {
    let config = statement.configuration();

    let Some(source) = parameter_object.filter(|v| !v.is_null()) else {
        return Ok(&NULL);
    };

    if source
        .type_tag()
        .is_some_and(|tag| config.type_handler_registry().has_type_handler(tag))
    {
        return Ok(source);
    }

    if let Some(value) = bound_sql.additional_parameter(property) {
        return Ok(value);
    }

    if let Some((item_name, rest)) = config.foreach_convention().split(property) {
        if let Some(item) = bound_sql.additional_parameter(item_name) {
            if item.is_null() {
                return Ok(&NULL);
            }
            return Ok(PropertyPath::parse(rest)?.resolve(item).unwrap_or(&NULL));
        }
    }

    Ok(PropertyPath::parse(property)?
        .resolve(source)
        .unwrap_or(&NULL))
}
