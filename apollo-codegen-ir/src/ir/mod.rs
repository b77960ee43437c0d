//! The intermediate representation handed to code generators.
//!
//! Compared to the GraphQL AST, the IR:
//! - interprets `@include`/`@skip`, pushing the conditions of inline fragments, fragment spreads
//!   and object fields down to their nested selections;
//! - interprets `@deprecated`;
//! - coerces argument values and default values against their expected types;
//! - infers the variables of named fragments;
//! - records which enums, input objects and custom scalars are used;
//! - embeds field definitions and types so that no reference to the AST or the schema remains.
//!
//! For polymorphic fields, each [`IrField`] holds several [`IrFieldSet`]s, building a tree whose
//! nodes are alternately fields and field sets.

mod path;
mod types;
mod value;

use apollo_compiler::Name;
use apollo_compiler::ast::OperationType;
use indexmap::IndexSet;
use serde::Serialize;

pub use self::path::ModelPath;
pub use self::path::ModelPathRoot;
pub use self::path::PathElement;
pub use self::path::TypeSet;
pub use self::types::IrNamedType;
pub use self::types::IrType;
pub use self::types::IrTypeKind;
pub use self::value::IrValue;
use crate::conditions::BooleanExpression;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntermediateRepresentation {
    pub operations: Vec<IrOperation>,
    /// Every named fragment available to the build, including the ones coming from metadata
    /// documents.
    pub all_named_fragments: Vec<IrNamedFragment>,
    /// The fragments declared in the user's own documents.
    pub named_fragments_to_generate: IndexSet<Name>,
    pub input_objects: Vec<IrInputObject>,
    pub enums: Vec<IrEnum>,
    pub custom_scalars: Vec<IrCustomScalar>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IrOperationType {
    Query,
    Mutation,
    Subscription,
}

impl From<OperationType> for IrOperationType {
    fn from(operation_type: OperationType) -> Self {
        match operation_type {
            OperationType::Query => IrOperationType::Query,
            OperationType::Mutation => IrOperationType::Mutation,
            OperationType::Subscription => IrOperationType::Subscription,
        }
    }
}

impl std::fmt::Display for IrOperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IrOperationType::Query => "query",
            IrOperationType::Mutation => "mutation",
            IrOperationType::Subscription => "subscription",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrOperation {
    pub name: Name,
    pub operation_type: IrOperationType,
    /// The root type the operation selects from.
    pub type_condition: Name,
    pub variables: Vec<IrVariable>,
    pub data_field: IrField,
    /// The operation text followed by every fragment it uses, directly or not. This is the
    /// document sent to the server.
    pub source_with_fragments: String,
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrNamedFragment {
    pub name: Name,
    pub type_condition: Name,
    /// Fragments do not declare variables, they are inferred from the fragment body. Their
    /// default value is always `None`.
    pub variables: Vec<IrVariable>,
    pub data_field: IrField,
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrField {
    pub name: Name,
    pub alias: Option<Name>,
    pub arguments: Vec<IrArgument>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    #[serde(rename = "type")]
    pub ty: IrType,
    /// Set when the field redeclares a field of a shape this field's parent shape implements.
    #[serde(rename = "override")]
    pub is_override: bool,
    pub condition: BooleanExpression,
    /// Empty for scalar and enum fields.
    pub field_sets: Vec<IrFieldSet>,
}

impl IrField {
    /// The key of this field in responses.
    pub fn response_name(&self) -> &Name {
        self.alias.as_ref().unwrap_or(&self.name)
    }

    /// The shape with no type condition other than the field's own type.
    pub fn base_field_set(&self) -> Option<&IrFieldSet> {
        self.field_sets
            .iter()
            .find(|field_set| field_set.type_set.len() == 1)
    }

    /// The shape a response object of the given concrete type maps to: the most specific field
    /// set that matches it.
    pub fn field_set_for_concrete_type(&self, type_name: &str) -> Option<&IrFieldSet> {
        self.field_sets
            .iter()
            .filter(|field_set| field_set.possible_types.contains(type_name))
            .max_by_key(|field_set| field_set.type_set.len())
    }

    pub fn field_set(&self, type_set: &TypeSet) -> Option<&IrFieldSet> {
        self.field_sets
            .iter()
            .find(|field_set| &field_set.type_set == type_set)
    }
}

/// The fields selected on a composite field for one [`TypeSet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrFieldSet {
    /// The path of the shape containing the field this field set belongs to.
    pub path: ModelPath,
    pub response_name: Name,
    pub type_set: TypeSet,
    /// The leaf type of the field.
    pub field_type: Name,
    pub fields: Vec<IrField>,
    /// The concrete object types this shape matches at runtime.
    pub possible_types: IndexSet<Name>,
    /// The shapes whose fields are a subset of this one's and whose generated interface this
    /// shape can implement.
    pub implements: IndexSet<ModelPath>,
}

impl IrFieldSet {
    pub fn full_path(&self) -> ModelPath {
        self.path.append(PathElement {
            type_set: self.type_set.clone(),
            field_type: self.field_type.clone(),
            response_name: self.response_name.clone(),
        })
    }

    pub fn field(&self, response_name: &str) -> Option<&IrField> {
        self.fields
            .iter()
            .find(|field| field.response_name().as_str() == response_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrVariable {
    pub name: Name,
    pub default_value: Option<IrValue>,
    #[serde(rename = "type")]
    pub ty: IrType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrArgument {
    pub name: Name,
    /// The value written at the call site, coerced: an `Int` literal in a `Float` position
    /// becomes a float.
    pub value: IrValue,
    /// The default value from the argument definition, coerced.
    pub default_value: Option<IrValue>,
    #[serde(rename = "type")]
    pub ty: IrType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrInputField {
    pub name: Name,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    #[serde(rename = "type")]
    pub ty: IrType,
    pub default_value: Option<IrValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrInputObject {
    pub name: Name,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    pub fields: Vec<IrInputField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IrEnum {
    pub name: Name,
    pub description: Option<String>,
    pub values: Vec<IrEnumValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IrEnumValue {
    pub name: Name,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IrCustomScalar {
    pub name: Name,
    pub description: Option<String>,
}
