use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use apollo_compiler::Name;
use serde::Serialize;

/// The static type of a field, argument, variable or input field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum IrType {
    NonNull(Box<IrType>),
    List(Box<IrType>),
    Named(IrNamedType),
}

impl IrType {
    /// The name of the innermost named type, e.g. `Character` for `[Character!]!`.
    pub fn leaf_name(&self) -> &str {
        self.leaf().name()
    }

    pub fn leaf(&self) -> &IrNamedType {
        match self {
            IrType::NonNull(of_type) | IrType::List(of_type) => of_type.leaf(),
            IrType::Named(named) => named,
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, IrType::NonNull(_))
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::NonNull(of_type) => write!(f, "{of_type}!"),
            IrType::List(of_type) => write!(f, "[{of_type}]"),
            IrType::Named(named) => f.write_str(named.name()),
        }
    }
}

/// The kind of a named type, as declared by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IrTypeKind {
    BuiltInScalar,
    CustomScalar,
    Enum,
    Object,
    Interface,
    Union,
    InputObject,
}

/// A named leaf type.
///
/// Two named types are the same type when they have the same name, whatever their kind.
#[derive(Debug, Clone, Serialize)]
pub enum IrNamedType {
    String,
    Int,
    Float,
    Boolean,
    Id,
    CustomScalar(Name),
    Enum(Name),
    Object(Name),
    Interface(Name),
    Union(Name),
    InputObject(Name),
}

impl IrNamedType {
    pub fn name(&self) -> &str {
        match self {
            IrNamedType::String => "String",
            IrNamedType::Int => "Int",
            IrNamedType::Float => "Float",
            IrNamedType::Boolean => "Boolean",
            IrNamedType::Id => "ID",
            IrNamedType::CustomScalar(name)
            | IrNamedType::Enum(name)
            | IrNamedType::Object(name)
            | IrNamedType::Interface(name)
            | IrNamedType::Union(name)
            | IrNamedType::InputObject(name) => name.as_str(),
        }
    }

    pub fn kind(&self) -> IrTypeKind {
        match self {
            IrNamedType::String
            | IrNamedType::Int
            | IrNamedType::Float
            | IrNamedType::Boolean
            | IrNamedType::Id => IrTypeKind::BuiltInScalar,
            IrNamedType::CustomScalar(_) => IrTypeKind::CustomScalar,
            IrNamedType::Enum(_) => IrTypeKind::Enum,
            IrNamedType::Object(_) => IrTypeKind::Object,
            IrNamedType::Interface(_) => IrTypeKind::Interface,
            IrNamedType::Union(_) => IrTypeKind::Union,
            IrNamedType::InputObject(_) => IrTypeKind::InputObject,
        }
    }

    /// Returns the built-in scalar with the given name, if there is one.
    pub fn built_in_scalar(name: &str) -> Option<Self> {
        Some(match name {
            "String" => IrNamedType::String,
            "Int" => IrNamedType::Int,
            "Float" => IrNamedType::Float,
            "Boolean" => IrNamedType::Boolean,
            "ID" => IrNamedType::Id,
            _ => return None,
        })
    }

    /// Whether fields of this type have sub-selections.
    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind(),
            IrTypeKind::Object | IrTypeKind::Interface | IrTypeKind::Union
        )
    }
}

impl PartialEq for IrNamedType {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for IrNamedType {}

impl Hash for IrNamedType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state)
    }
}
