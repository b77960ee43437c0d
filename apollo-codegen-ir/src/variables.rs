//! Inference of the variables of named fragments, which GraphQL does not let them declare.

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::Schema;
use apollo_compiler::ast::Type;
use apollo_compiler::ast::Value;
use apollo_compiler::executable::DirectiveList;
use apollo_compiler::executable::Fragment;
use apollo_compiler::executable::Selection;
use apollo_compiler::executable::SelectionSet;
use apollo_compiler::schema::ExtendedType;
use indexmap::IndexMap;
use indexmap::IndexSet;
use indexmap::map::Entry;

use crate::error::UserQueryError;

/// The variables referenced by a fragment, with the type of the position using them, in
/// first-reference order.
///
/// References are looked up in field arguments, in values nested in lists and input objects, and
/// in the arguments of directives known to the schema, including `@skip` and `@include`. Nested
/// fragment spreads are followed.
///
/// # Errors
///
/// Returns [`UserQueryError::AmbiguousVariableType`] if a variable is used at positions of
/// incompatible types. A nullable position and a non-null position of the same type are
/// compatible: the variable then takes the non-null type. Returns
/// [`UserQueryError::UntypedVariable`] for a variable nested in a custom scalar literal.
pub(crate) fn infer_fragment_variables(
    schema: &Schema,
    fragment: &Fragment,
    fragments: &IndexMap<Name, &Node<Fragment>>,
) -> Result<IndexMap<Name, Type>, UserQueryError> {
    let mut inference = VariableInference {
        schema,
        fragments,
        fragment: &fragment.name,
        visited: IndexSet::new(),
        variables: IndexMap::new(),
    };
    inference.visit_selection_set(&fragment.selection_set)?;
    Ok(inference.variables)
}

struct VariableInference<'a> {
    schema: &'a Schema,
    fragments: &'a IndexMap<Name, &'a Node<Fragment>>,
    fragment: &'a Name,
    visited: IndexSet<Name>,
    variables: IndexMap<Name, Type>,
}

impl VariableInference<'_> {
    fn visit_selection_set(&mut self, selection_set: &SelectionSet) -> Result<(), UserQueryError> {
        for selection in &selection_set.selections {
            match selection {
                Selection::Field(field) => {
                    self.visit_directives(&field.directives)?;
                    for argument in &field.arguments {
                        let Some(definition) = field.definition.argument_by_name(&argument.name)
                        else {
                            return Err(UserQueryError::UnknownArgument {
                                field: field.name.clone(),
                                argument: argument.name.clone(),
                            });
                        };
                        self.visit_value(&argument.value, &definition.ty)?;
                    }
                    self.visit_selection_set(&field.selection_set)?;
                }
                Selection::InlineFragment(inline_fragment) => {
                    self.visit_directives(&inline_fragment.directives)?;
                    self.visit_selection_set(&inline_fragment.selection_set)?;
                }
                Selection::FragmentSpread(spread) => {
                    self.visit_directives(&spread.directives)?;
                    if !self.visited.insert(spread.fragment_name.clone()) {
                        continue;
                    }
                    let Some(fragment) = self.fragments.get(&spread.fragment_name).copied() else {
                        return Err(UserQueryError::UnknownFragment(spread.fragment_name.clone()));
                    };
                    self.visit_selection_set(&fragment.selection_set)?;
                }
            }
        }
        Ok(())
    }

    fn visit_directives(&mut self, directives: &DirectiveList) -> Result<(), UserQueryError> {
        for directive in directives.iter() {
            let Some(definition) = self.schema.directive_definitions.get(&directive.name) else {
                continue;
            };
            for argument in &directive.arguments {
                if let Some(argument_definition) = definition.argument_by_name(&argument.name) {
                    self.visit_value(&argument.value, &argument_definition.ty)?;
                }
            }
        }
        Ok(())
    }

    fn visit_value(&mut self, value: &Value, expected: &Type) -> Result<(), UserQueryError> {
        match value {
            Value::Variable(name) => self.record(name, expected),
            Value::List(items) => {
                let (Type::List(item_type) | Type::NonNullList(item_type)) = expected else {
                    return self.reject_nested_variables(value);
                };
                for item in items {
                    self.visit_value(item, item_type)?;
                }
                Ok(())
            }
            Value::Object(fields) => {
                let Some(ExtendedType::InputObject(input_object)) =
                    self.schema.types.get(expected.inner_named_type())
                else {
                    return self.reject_nested_variables(value);
                };
                for (name, value) in fields {
                    if let Some(field_definition) = input_object.fields.get(name) {
                        self.visit_value(value, &field_definition.ty)?;
                    }
                }
                Ok(())
            }
            Value::Null
            | Value::Enum(_)
            | Value::String(_)
            | Value::Float(_)
            | Value::Int(_)
            | Value::Boolean(_) => Ok(()),
        }
    }

    /// Lists and objects only reach a single-value position as custom scalar literals, which
    /// give no type to the variables inside them.
    fn reject_nested_variables(&self, value: &Value) -> Result<(), UserQueryError> {
        match value {
            Value::Variable(name) => Err(UserQueryError::UntypedVariable {
                fragment: self.fragment.clone(),
                variable: name.clone(),
            }),
            Value::List(items) => items
                .iter()
                .try_for_each(|item| self.reject_nested_variables(item)),
            Value::Object(fields) => fields
                .iter()
                .try_for_each(|(_, value)| self.reject_nested_variables(value)),
            Value::Null
            | Value::Enum(_)
            | Value::String(_)
            | Value::Float(_)
            | Value::Int(_)
            | Value::Boolean(_) => Ok(()),
        }
    }

    fn record(&mut self, name: &Name, ty: &Type) -> Result<(), UserQueryError> {
        match self.variables.entry(name.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(ty.clone());
            }
            Entry::Occupied(mut entry) => {
                let Some(merged) = merge_types(entry.get(), ty) else {
                    return Err(UserQueryError::AmbiguousVariableType {
                        fragment: self.fragment.clone(),
                        variable: name.clone(),
                        first: entry.get().to_string(),
                        second: ty.to_string(),
                    });
                };
                entry.insert(merged);
            }
        }
        Ok(())
    }
}

/// The type of a variable used at positions of both types, if there is one.
fn merge_types(left: &Type, right: &Type) -> Option<Type> {
    match (left, right) {
        (Type::Named(left), Type::Named(right)) if left == right => Some(Type::Named(left.clone())),
        (Type::NonNullNamed(left), Type::Named(right) | Type::NonNullNamed(right))
        | (Type::Named(left), Type::NonNullNamed(right))
            if left == right =>
        {
            Some(Type::NonNullNamed(left.clone()))
        }
        (Type::List(left), Type::List(right)) => {
            Some(Type::List(Box::new(merge_types(left, right)?)))
        }
        (Type::NonNullList(left), Type::List(right) | Type::NonNullList(right))
        | (Type::List(left), Type::NonNullList(right)) => {
            Some(Type::NonNullList(Box::new(merge_types(left, right)?)))
        }
        _ => None,
    }
}
