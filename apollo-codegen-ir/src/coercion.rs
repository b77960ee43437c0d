//! Validation and conversion of literal values against their expected input types.

use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::ast::Type;
use apollo_compiler::ast::Value;
use apollo_compiler::schema::ExtendedType;

use crate::error::CoercionError;
use crate::ir::IrNamedType;
use crate::ir::IrValue;

/// Coerces an argument value or a default value against the type of its position.
///
/// Integer literals in `Float` positions become floats. Variables are passed through unresolved:
/// their own type is not checked here. Custom scalars take any value as written.
///
/// # Errors
///
/// Returns a [`CoercionError`] if the shape of the value cannot satisfy `expected`, including
/// lists given for a single value and single values given for a list.
pub(crate) fn coerce(
    value: &Value,
    expected: &Type,
    schema: &Schema,
) -> Result<IrValue, CoercionError> {
    match (value, expected) {
        (Value::Variable(name), _) => Ok(IrValue::Variable(name.clone())),
        (Value::Null, _) if expected.is_non_null() => Err(CoercionError::NullInNonNull {
            expected: expected.to_string(),
        }),
        (Value::Null, _) => Ok(IrValue::Null),
        (Value::List(items), Type::List(item_type) | Type::NonNullList(item_type)) => items
            .iter()
            .map(|item| coerce(item, item_type, schema))
            .collect::<Result<_, _>>()
            .map(IrValue::List),
        (_, Type::List(_) | Type::NonNullList(_)) | (Value::List(_), _) => {
            Err(mismatch(value, expected))
        }
        (_, Type::Named(name) | Type::NonNullNamed(name)) => {
            // Built-in scalars are only part of `schema.types` when the schema references them.
            if let Some(built_in) = IrNamedType::built_in_scalar(name) {
                return coerce_built_in_scalar(value, expected, name, &built_in);
            }
            match schema.types.get(name) {
                Some(ExtendedType::Scalar(_)) => Ok(as_written(value)),
                Some(ExtendedType::Enum(definition)) => match value {
                    Value::Enum(symbol) if definition.values.contains_key(symbol) => {
                        Ok(IrValue::Enum(symbol.clone()))
                    }
                    _ => Err(mismatch(value, expected)),
                },
                Some(ExtendedType::InputObject(definition)) => {
                    let Value::Object(fields) = value else {
                        return Err(mismatch(value, expected));
                    };
                    let mut coerced: Vec<(Name, IrValue)> = Vec::with_capacity(fields.len());
                    for (field_name, field_value) in fields {
                        if coerced.iter().any(|(seen, _)| seen == field_name) {
                            return Err(CoercionError::DuplicateInputField {
                                input_object: name.clone(),
                                field: field_name.clone(),
                            });
                        }
                        let Some(field_definition) = definition.fields.get(field_name) else {
                            return Err(CoercionError::UnknownInputField {
                                input_object: name.clone(),
                                field: field_name.clone(),
                            });
                        };
                        coerced.push((
                            field_name.clone(),
                            coerce(field_value, &field_definition.ty, schema)?,
                        ));
                    }
                    if let Some((missing, _)) = definition.fields.iter().find(|(field_name, field)| {
                        field.is_required() && !coerced.iter().any(|(seen, _)| seen == *field_name)
                    }) {
                        return Err(CoercionError::MissingInputField {
                            input_object: name.clone(),
                            field: missing.clone(),
                        });
                    }
                    Ok(IrValue::Object(coerced))
                }
                Some(_) => Err(mismatch(value, expected)),
                None => Err(CoercionError::UnknownType(name.clone())),
            }
        }
    }
}

fn coerce_built_in_scalar(
    value: &Value,
    expected: &Type,
    name: &Name,
    built_in: &IrNamedType,
) -> Result<IrValue, CoercionError> {
    match (built_in, value) {
        (IrNamedType::Int, Value::Int(int)) => int
            .try_to_i32()
            .map(IrValue::Int)
            .map_err(|_| invalid_number(name, int.as_str())),
        (IrNamedType::Float, Value::Int(int)) => int
            .try_to_f64()
            .map(IrValue::Float)
            .map_err(|_| invalid_number(name, int.as_str())),
        (IrNamedType::Float, Value::Float(float)) => float
            .try_to_f64()
            .map(IrValue::Float)
            .map_err(|_| invalid_number(name, float.as_str())),
        (IrNamedType::String | IrNamedType::Id, Value::String(string)) => {
            Ok(IrValue::String(string.to_string()))
        }
        (IrNamedType::Id, Value::Int(int)) => Ok(IrValue::String(int.as_str().to_owned())),
        (IrNamedType::Boolean, Value::Boolean(boolean)) => Ok(IrValue::Boolean(*boolean)),
        _ => Err(mismatch(value, expected)),
    }
}

/// Converts a value without an expected type, for custom scalars.
fn as_written(value: &Value) -> IrValue {
    match value {
        Value::Null => IrValue::Null,
        Value::Enum(symbol) => IrValue::Enum(symbol.clone()),
        Value::Variable(name) => IrValue::Variable(name.clone()),
        Value::String(string) => IrValue::String(string.to_string()),
        Value::Float(float) => match float.try_to_f64() {
            Ok(float) => IrValue::Float(float),
            Err(_) => IrValue::String(float.as_str().to_owned()),
        },
        Value::Int(int) => match (int.try_to_i32(), int.try_to_f64()) {
            (Ok(int), _) => IrValue::Int(int),
            (Err(_), Ok(float)) => IrValue::Float(float),
            (Err(_), Err(_)) => IrValue::String(int.as_str().to_owned()),
        },
        Value::Boolean(boolean) => IrValue::Boolean(*boolean),
        Value::List(items) => IrValue::List(items.iter().map(|item| as_written(item)).collect()),
        Value::Object(fields) => IrValue::Object(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), as_written(value)))
                .collect(),
        ),
    }
}

fn invalid_number(expected: &Name, value: &str) -> CoercionError {
    CoercionError::InvalidNumber {
        expected: expected.clone(),
        value: value.to_owned(),
    }
}

fn mismatch(value: &Value, expected: &Type) -> CoercionError {
    CoercionError::TypeMismatch {
        expected: expected.to_string(),
        value: value.to_string(),
    }
}
