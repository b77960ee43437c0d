use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::ast;
use apollo_compiler::schema::ExtendedType;
use indexmap::IndexSet;

use crate::error::UserQueryError;
use crate::ir::IrNamedType;
use crate::ir::IrType;

/// The enums, input objects and custom scalars referenced while building one IR.
///
/// Only [`UsedTypes::map_type`] writes to it. Object, interface and union types are never
/// recorded: whether a composite shape is generated only depends on the operations selecting it.
#[derive(Debug, Default)]
pub(crate) struct UsedTypes {
    enums: IndexSet<Name>,
    input_objects: IndexSet<Name>,
    custom_scalars: IndexSet<Name>,
}

impl UsedTypes {
    /// Converts a type reference, recording its leaf type when it is an enum, an input object or
    /// a custom scalar.
    pub(crate) fn map_type(
        &mut self,
        schema: &Schema,
        ty: &ast::Type,
    ) -> Result<IrType, UserQueryError> {
        Ok(match ty {
            ast::Type::Named(name) => IrType::Named(self.map_named_type(schema, name)?),
            ast::Type::NonNullNamed(name) => IrType::NonNull(Box::new(IrType::Named(
                self.map_named_type(schema, name)?,
            ))),
            ast::Type::List(item) => IrType::List(Box::new(self.map_type(schema, item)?)),
            ast::Type::NonNullList(item) => IrType::NonNull(Box::new(IrType::List(Box::new(
                self.map_type(schema, item)?,
            )))),
        })
    }

    pub(crate) fn map_named_type(
        &mut self,
        schema: &Schema,
        name: &Name,
    ) -> Result<IrNamedType, UserQueryError> {
        if let Some(built_in) = IrNamedType::built_in_scalar(name) {
            return Ok(built_in);
        }
        let Some(definition) = schema.types.get(name) else {
            return Err(UserQueryError::UnknownType(name.clone()));
        };
        Ok(match definition {
            ExtendedType::Scalar(_) => {
                self.custom_scalars.insert(name.clone());
                IrNamedType::CustomScalar(name.clone())
            }
            ExtendedType::Enum(_) => {
                self.enums.insert(name.clone());
                IrNamedType::Enum(name.clone())
            }
            ExtendedType::InputObject(_) => {
                self.input_objects.insert(name.clone());
                IrNamedType::InputObject(name.clone())
            }
            ExtendedType::Object(_) => IrNamedType::Object(name.clone()),
            ExtendedType::Interface(_) => IrNamedType::Interface(name.clone()),
            ExtendedType::Union(_) => IrNamedType::Union(name.clone()),
        })
    }

    /// Records a schema type as used whatever its kind, for types generated unconditionally.
    pub(crate) fn mark(&mut self, name: &Name, definition: &ExtendedType) {
        match definition {
            ExtendedType::Scalar(_) if !definition.is_built_in() => {
                self.custom_scalars.insert(name.clone());
            }
            ExtendedType::Enum(_) => {
                self.enums.insert(name.clone());
            }
            ExtendedType::InputObject(_) => {
                self.input_objects.insert(name.clone());
            }
            _ => {}
        }
    }

    pub(crate) fn enums(&self) -> &IndexSet<Name> {
        &self.enums
    }

    pub(crate) fn input_objects(&self) -> &IndexSet<Name> {
        &self.input_objects
    }

    pub(crate) fn custom_scalars(&self) -> &IndexSet<Name> {
        &self.custom_scalars
    }
}
