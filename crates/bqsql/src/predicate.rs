//! Predicate encoder: filter records to parameterized `WHERE` conditions.
//!
//! Each field of a [`Record`] becomes one condition, and conditions are joined
//! with ` AND ` in declaration order:
//!
//! | Value                   | Condition                                        |
//! |-------------------------|--------------------------------------------------|
//! | string                  | `Namespace = @Namespace`                         |
//! | `true` / `false`        | `IsTaker` / `NOT IsTaker`                        |
//! | list                    | `Owner IN (@Owner0,@Owner1)`                     |
//! | time range              | `CreatedAt BETWEEN @CreatedAtFrom AND @CreatedAtTo` |
//! | string/list + `unnest`  | `EXISTS (SELECT * FROM UNNEST(Roles) AS x WHERE x IN (@Roles0))` |
//!
//! Empty lists are always skipped since `IN ()` is not valid SQL.

use crate::Error;
use crate::Result;
use crate::filter::{Field, FilterRecord, Value};
use crate::options::FieldOptions;
use crate::params::{
    Parameter, append_param, element_param_name, placeholder, range_from_param_name,
    range_to_param_name,
};
use crate::time_range::format_instant;

/// A predicate together with the parameters it references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedFilter {
    /// Conditions joined with ` AND `. Empty when every field was skipped.
    pub predicate: String,
    /// One entry per `@name` placeholder, in construction order.
    pub params: Vec<Parameter>,
}

impl EncodedFilter {
    /// Whether no condition was produced.
    pub fn is_empty(&self) -> bool {
        self.predicate.is_empty()
    }
}

/// Encode a filter record into a predicate and its parameters.
///
/// # Errors
///
/// - [`Error::InputKind`] if `filter` is not a record
/// - [`Error::UnsupportedField`] if a field's value has no encoding rule
/// - [`Error::UnsupportedStruct`] if a field holds a nested record
/// - [`Error::UnsupportedUnnest`] if `unnest` is set on a bool or time range
/// - [`Error::InvalidTimeFormat`] if a time range format cannot be applied
pub fn encode_where_clause(filter: &Value) -> Result<EncodedFilter> {
    let Value::Record(record) = filter else {
        return Err(Error::InputKind {
            kind: filter.kind(),
        });
    };

    let mut conditions = Vec::with_capacity(record.fields.len());
    // Time ranges use two slots and booleans none, so this is an estimate.
    let mut params = Vec::with_capacity(record.fields.len());

    for field in &record.fields {
        if let Some(condition) = encode_field(field, &mut params)? {
            conditions.push(condition);
        }
    }

    let encoded = EncodedFilter {
        predicate: conditions.join(" AND "),
        params,
    };
    tracing::debug!(
        fields = record.fields.len(),
        conditions = conditions.len(),
        predicate_len = encoded.predicate.len(),
        params = encoded.params.len(),
        "Encoded filter"
    );
    Ok(encoded)
}

/// Encode any [`FilterRecord`] implementor.
pub fn encode_filter<F: FilterRecord + ?Sized>(filter: &F) -> Result<EncodedFilter> {
    encode_where_clause(&Value::Record(filter.to_record()))
}

/// Encode a single field, returning `None` when it contributes nothing.
fn encode_field(field: &Field, params: &mut Vec<Parameter>) -> Result<Option<String>> {
    let options = FieldOptions::parse(field.tag.as_deref().unwrap_or_default());

    if options.omit_empty && field.value.is_zero() {
        tracing::trace!(field = %field.name, "Skipping empty field");
        return Ok(None);
    }

    let name = options.column_name(&field.name);

    let value = match &field.value {
        Value::Optional(Some(inner)) => inner.as_ref(),
        Value::Optional(None) => return Err(Error::unsupported_field(name, field.value.kind())),
        value => value,
    };

    let comparison = match value {
        Value::String(s) => {
            append_param(params, name, s.as_str());
            format!(" = {}", placeholder(name))
        }
        Value::List(items) => {
            if items.is_empty() {
                tracing::trace!(field = %field.name, "Skipping empty list");
                return Ok(None);
            }
            encode_list(name, items, params)?
        }
        Value::Bool(b) => {
            if options.unnest {
                return Err(Error::unsupported_unnest(name, value.kind()));
            }
            let condition = if *b {
                name.to_string()
            } else {
                format!("NOT {name}")
            };
            return Ok(Some(condition));
        }
        Value::TimeRange(range) => {
            if options.unnest {
                return Err(Error::unsupported_unnest(name, value.kind()));
            }
            let format = field.format.as_deref();
            let from_name = range_from_param_name(name);
            let to_name = range_to_param_name(name);
            let from = format_instant(&range.from, format, name)?;
            let to = format_instant(&range.to, format, name)?;
            append_param(params, from_name.as_str(), from);
            append_param(params, to_name.as_str(), to);
            format!(
                " BETWEEN {} AND {}",
                placeholder(&from_name),
                placeholder(&to_name)
            )
        }
        Value::Record(_) => return Err(Error::unsupported_struct(name)),
        Value::Int(_) | Value::Float(_) | Value::Optional(_) => {
            return Err(Error::unsupported_field(name, value.kind()));
        }
    };

    let condition = if options.unnest {
        format!("EXISTS (SELECT * FROM UNNEST({name}) AS x WHERE x{comparison})")
    } else {
        format!("{name}{comparison}")
    };
    Ok(Some(condition))
}

/// Build ` IN (@name0,@name1,...)` and bind one parameter per element.
fn encode_list(name: &str, items: &[Value], params: &mut Vec<Parameter>) -> Result<String> {
    let mut placeholders = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let value = item
            .as_param()
            .ok_or_else(|| Error::unsupported_field(name, item.kind()))?;
        let elem_name = element_param_name(name, index);
        placeholders.push(placeholder(&elem_name));
        append_param(params, elem_name, value);
    }
    Ok(format!(" IN ({})", placeholders.join(",")))
}
