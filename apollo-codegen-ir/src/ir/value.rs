use std::fmt;

use apollo_compiler::Name;
use serde::Serialize;

/// A literal value after coercion against its expected type.
///
/// Variable references are kept unresolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IrValue {
    Int(i32),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(Name),
    Null,
    /// Field names are unique within one object value.
    Object(Vec<(Name, IrValue)>),
    List(Vec<IrValue>),
    Variable(Name),
}

impl fmt::Display for IrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrValue::Int(value) => write!(f, "{value}"),
            IrValue::Float(value) => write!(f, "{value:?}"),
            IrValue::String(value) => write!(f, "{value:?}"),
            IrValue::Boolean(value) => write!(f, "{value}"),
            IrValue::Enum(value) => write!(f, "{value}"),
            IrValue::Null => f.write_str("null"),
            IrValue::Object(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
            IrValue::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            IrValue::Variable(name) => write!(f, "${name}"),
        }
    }
}
