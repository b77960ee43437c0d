//! Construction of the field/field-set tree of operations and named fragments.
//!
//! A field with sub-selections gets one [`IrFieldSet`] per [`TypeSet`] under which its merged
//! selections differ. Type sets are derived from the concrete object types the field can resolve
//! to: each one maps to the field's own type plus every narrowing type condition it satisfies. The
//! base type set, holding only the field's type, always exists.

mod collect;

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::Schema;
use apollo_compiler::executable::Field;
use apollo_compiler::executable::Fragment;
use apollo_compiler::executable::SelectionSet;
use apollo_compiler::name;
use indexmap::IndexMap;
use indexmap::IndexSet;
use tracing::trace;

pub(crate) use self::collect::used_fragments;
use self::collect::MergedField;
use self::collect::Shape;
use crate::coercion::coerce;
use crate::conditions::BooleanExpression;
use crate::error::IrError;
use crate::error::UserQueryError;
use crate::ir::IrArgument;
use crate::ir::IrField;
use crate::ir::IrFieldSet;
use crate::ir::IrNamedFragment;
use crate::ir::IrNamedType;
use crate::ir::IrType;
use crate::ir::ModelPath;
use crate::ir::ModelPathRoot;
use crate::ir::PathElement;
use crate::ir::TypeSet;
use crate::possible_types::PossibleTypes;
use crate::used_types::UsedTypes;
use crate::utils::DirectiveListExt;
use crate::utils::logging::snapshot;

pub(crate) const DATA_FIELD_DESCRIPTION: &str = "Synthetic data field";

/// The named fragments available to a build, user fragments first.
pub(crate) type FragmentDefinitions<'a> = IndexMap<Name, &'a Node<Fragment>>;

pub(crate) struct FieldSetBuilder<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) fragments: &'a FragmentDefinitions<'a>,
    /// Fragments already built. A fragment is always built after the fragments it spreads.
    pub(crate) built_fragments: &'a IndexMap<Name, IrNamedFragment>,
    pub(crate) possible_types: &'a PossibleTypes,
    pub(crate) used_types: &'a mut UsedTypes,
}

impl<'a> FieldSetBuilder<'a> {
    /// Builds the synthetic `data` field holding the selections of an operation or a fragment.
    pub(crate) fn build_data_field(
        &mut self,
        selection_set: &'a SelectionSet,
        root: ModelPath,
    ) -> Result<IrField, IrError> {
        let type_condition = &selection_set.ty;
        if !self.schema.types.contains_key(type_condition) {
            return Err(UserQueryError::UnknownType(type_condition.clone()).into());
        }
        let response_name = name!("data");
        let field_sets = self.build_field_sets(
            type_condition,
            &response_name,
            &[(selection_set, BooleanExpression::True)],
            &root,
            &[],
        )?;
        Ok(IrField {
            name: response_name,
            alias: None,
            arguments: Vec::new(),
            description: Some(DATA_FIELD_DESCRIPTION.to_owned()),
            deprecation_reason: None,
            // Generated models are rooted in an object, whatever the kind of the type condition.
            ty: IrType::Named(IrNamedType::Object(type_condition.clone())),
            is_override: false,
            condition: BooleanExpression::True,
            field_sets,
        })
    }

    pub(crate) fn fragment(&self, name: &Name) -> Result<&'a Node<Fragment>, UserQueryError> {
        self.fragments
            .get(name)
            .copied()
            .ok_or_else(|| UserQueryError::UnknownFragment(name.clone()))
    }

    /// The type sets of a field of type `field_type` with the given sub-selections, base first,
    /// then by size, then by name.
    fn type_sets(
        &self,
        field_type: &Name,
        selection_sets: &[(&'a SelectionSet, BooleanExpression)],
    ) -> Result<Vec<TypeSet>, IrError> {
        let mut type_conditions = IndexSet::new();
        for (selection_set, _) in selection_sets {
            self.collect_type_conditions(*selection_set, &mut type_conditions)?;
        }
        let possible_types = self.possible_types.of(field_type);
        let narrowing: Vec<&Name> = type_conditions
            .into_iter()
            .filter(|type_condition| {
                *type_condition != field_type
                    && !self
                        .possible_types
                        .is_covered_by(possible_types, type_condition)
            })
            .collect();

        let base = TypeSet::single(field_type.clone());
        let mut type_sets = IndexSet::new();
        type_sets.insert(base.clone());
        for object_type in possible_types {
            let type_set = narrowing
                .iter()
                .filter(|type_condition| {
                    self.possible_types
                        .of(type_condition)
                        .contains(object_type)
                })
                .fold(base.clone(), |type_set, type_condition| {
                    type_set.with((*type_condition).clone())
                });
            type_sets.insert(type_set);
        }
        let mut type_sets: Vec<TypeSet> = type_sets.into_iter().collect();
        type_sets.sort_by(|left, right| {
            left.len().cmp(&right.len()).then_with(|| {
                left.iter()
                    .map(Name::as_str)
                    .cmp(right.iter().map(Name::as_str))
            })
        });
        Ok(type_sets)
    }

    /// Builds the field sets of one field.
    ///
    /// `path` is the path of the shape holding the field. `inherited` are the fields with the same
    /// response name in the shapes that shape implements: their field sets are candidates for the
    /// `implements` of the new ones.
    fn build_field_sets(
        &mut self,
        field_type: &Name,
        response_name: &Name,
        selection_sets: &[(&'a SelectionSet, BooleanExpression)],
        path: &ModelPath,
        inherited: &[&IrField],
    ) -> Result<Vec<IrFieldSet>, IrError> {
        let built_fragments = self.built_fragments;
        let mut field_sets: Vec<IrFieldSet> = Vec::new();
        for type_set in self.type_sets(field_type, selection_sets)? {
            let possible_types = self.possible_types.of_type_set(&type_set);
            let collected = self.collect_fields(
                selection_sets,
                &Shape {
                    type_set: &type_set,
                    possible_types: &possible_types,
                },
            )?;
            let shape_path = path.append(PathElement {
                type_set: type_set.clone(),
                field_type: field_type.clone(),
                response_name: response_name.clone(),
            });

            let siblings = field_sets
                .iter()
                .filter(|sibling| {
                    sibling.type_set != type_set && sibling.type_set.is_subset(&type_set)
                });
            let fragments = collected
                .fragment_spreads
                .iter()
                .filter_map(|name| built_fragments.get(name))
                .flat_map(|fragment| &fragment.data_field.field_sets);
            let inherited = inherited
                .iter()
                .copied()
                .flat_map(|field| &field.field_sets);
            let mut implements = IndexSet::new();
            let mut implementees: Vec<&IrFieldSet> = Vec::new();
            for candidate in siblings.chain(fragments).chain(inherited) {
                let fits = possible_types
                    .iter()
                    .all(|name| candidate.possible_types.contains(name))
                    && candidate
                        .fields
                        .iter()
                        .all(|field| collected.fields.contains_key(field.response_name()));
                if fits && implements.insert(interface_path(candidate.full_path())) {
                    implementees.push(candidate);
                }
            }

            let mut fields = Vec::with_capacity(collected.fields.len());
            for (field_response_name, merged) in &collected.fields {
                fields.push(self.build_field(
                    field_response_name,
                    merged,
                    &shape_path,
                    &implementees,
                )?);
            }
            trace!(
                path = %shape_path,
                possible_types = possible_types.len(),
                implements = implements.len(),
                "built field set"
            );
            let field_set = IrFieldSet {
                path: path.clone(),
                response_name: response_name.clone(),
                type_set,
                field_type: field_type.clone(),
                fields,
                possible_types,
                implements,
            };
            snapshot!(field_set, "field set");
            field_sets.push(field_set);
        }
        Ok(field_sets)
    }

    fn build_field(
        &mut self,
        response_name: &Name,
        merged: &MergedField<'a>,
        path: &ModelPath,
        implementees: &[&IrFieldSet],
    ) -> Result<IrField, IrError> {
        // The selection made on the most specific parent type carries the most specific
        // definition.
        let representative =
            merged.min_by_key(|occurrence| self.possible_types.of(occurrence.parent_type).len());
        let field: &'a Node<Field> = representative.field;
        let definition = &field.definition;

        let ty = self.used_types.map_type(self.schema, &definition.ty)?;
        let arguments = self.build_arguments(field)?;
        let condition =
            BooleanExpression::any(merged.iter().map(|occurrence| occurrence.condition.clone()));
        let is_override = implementees
            .iter()
            .any(|implementee| implementee.field(response_name).is_some());

        let field_sets = if ty.leaf().is_composite() {
            let selection_sets: Vec<(&'a SelectionSet, BooleanExpression)> = merged
                .iter()
                .map(|occurrence| {
                    let field: &'a Node<Field> = occurrence.field;
                    (&field.selection_set, occurrence.condition.clone())
                })
                .collect();
            let inherited: Vec<&IrField> = implementees
                .iter()
                .filter_map(|implementee| implementee.field(response_name))
                .collect();
            self.build_field_sets(
                definition.ty.inner_named_type(),
                response_name,
                &selection_sets,
                path,
                &inherited,
            )?
        } else {
            Vec::new()
        };

        Ok(IrField {
            name: field.name.clone(),
            alias: field.alias.clone(),
            arguments,
            description: definition
                .description
                .as_ref()
                .map(|description| description.to_string()),
            deprecation_reason: definition.directives.deprecation_reason(),
            ty,
            is_override,
            condition,
            field_sets,
        })
    }

    /// The arguments written on a field, coerced against their definitions.
    fn build_arguments(&mut self, field: &Field) -> Result<Vec<IrArgument>, IrError> {
        let mut arguments = Vec::with_capacity(field.arguments.len());
        for argument in &field.arguments {
            let Some(definition) = field.definition.argument_by_name(&argument.name) else {
                return Err(UserQueryError::UnknownArgument {
                    field: field.name.clone(),
                    argument: argument.name.clone(),
                }
                .into());
            };
            let default_value = definition
                .default_value
                .as_ref()
                .map(|default_value| coerce(default_value, &definition.ty, self.schema))
                .transpose()?;
            arguments.push(IrArgument {
                name: argument.name.clone(),
                value: coerce(&argument.value, &definition.ty, self.schema)?,
                default_value,
                ty: self.used_types.map_type(self.schema, &definition.ty)?,
            });
        }
        Ok(arguments)
    }
}

/// Shapes of an operation are implemented by concrete classes but extended through their
/// interfaces, so paths used as `implements` targets point at the interface.
fn interface_path(path: ModelPath) -> ModelPath {
    match path.root() {
        ModelPathRoot::OperationImplementation => {
            path.with_root(ModelPathRoot::OperationInterface)
        }
        ModelPathRoot::OperationInterface | ModelPathRoot::Fragment => path,
    }
}
