//! Flattening of selection sets into the fields one shape selects.

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::executable::Field;
use apollo_compiler::executable::Fragment;
use apollo_compiler::executable::Selection;
use apollo_compiler::executable::SelectionSet;
use indexmap::IndexMap;
use indexmap::IndexSet;
use indexmap::map::Entry;

use super::FieldSetBuilder;
use crate::conditions::BooleanExpression;
use crate::error::IrError;
use crate::error::UserQueryError;
use crate::ir::TypeSet;

/// One selection of a field, with every condition leading to it applied.
pub(super) struct Occurrence<'a> {
    pub(super) field: &'a Node<Field>,
    /// The type the field is selected on.
    pub(super) parent_type: &'a Name,
    pub(super) condition: BooleanExpression,
}

/// All the selections of one response name within a shape.
pub(super) struct MergedField<'a> {
    first: Occurrence<'a>,
    others: Vec<Occurrence<'a>>,
}

impl<'a> MergedField<'a> {
    pub(super) fn iter(&self) -> impl Iterator<Item = &Occurrence<'a>> {
        std::iter::once(&self.first).chain(&self.others)
    }

    /// The first occurrence with the smallest key.
    pub(super) fn min_by_key(&self, key: impl Fn(&Occurrence<'a>) -> usize) -> &Occurrence<'a> {
        self.others.iter().fold(&self.first, |best, occurrence| {
            if key(occurrence) < key(best) {
                occurrence
            } else {
                best
            }
        })
    }
}

#[derive(Default)]
pub(super) struct CollectedFields<'a> {
    /// Keyed by response name, in first-selection order.
    pub(super) fields: IndexMap<Name, MergedField<'a>>,
    /// The named fragments whose selections were merged into the shape.
    pub(super) fragment_spreads: IndexSet<Name>,
}

/// The shape selections are being collected for.
pub(super) struct Shape<'s> {
    pub(super) type_set: &'s TypeSet,
    pub(super) possible_types: &'s IndexSet<Name>,
}

impl<'a> FieldSetBuilder<'a> {
    /// Whether selections under `type_condition` apply to every object the shape matches.
    fn applies(&self, type_condition: &Name, shape: &Shape<'_>) -> bool {
        shape.type_set.contains(type_condition)
            || (!shape.possible_types.is_empty()
                && self
                    .possible_types
                    .is_covered_by(shape.possible_types, type_condition))
    }

    /// Merges the fields selected for `shape` by the given selection sets, inlining inline
    /// fragments and fragment spreads that apply to it.
    ///
    /// Each selection set comes with the condition of the selection it belongs to, which is pushed
    /// down onto every field it contains.
    pub(super) fn collect_fields(
        &self,
        selection_sets: &[(&'a SelectionSet, BooleanExpression)],
        shape: &Shape<'_>,
    ) -> Result<CollectedFields<'a>, IrError> {
        let mut collected = CollectedFields::default();
        for (selection_set, condition) in selection_sets {
            self.collect_into(*selection_set, condition, shape, &mut collected)?;
        }
        Ok(collected)
    }

    fn collect_into(
        &self,
        selection_set: &'a SelectionSet,
        condition: &BooleanExpression,
        shape: &Shape<'_>,
        collected: &mut CollectedFields<'a>,
    ) -> Result<(), IrError> {
        for selection in &selection_set.selections {
            match selection {
                Selection::Field(field) => {
                    let response_name = field.response_key();
                    let occurrence = Occurrence {
                        field,
                        parent_type: &selection_set.ty,
                        condition: condition.clone().and(BooleanExpression::from_directives(
                            &field.directives,
                            response_name,
                        )?),
                    };
                    match collected.fields.entry(response_name.clone()) {
                        Entry::Occupied(mut entry) => entry.get_mut().others.push(occurrence),
                        Entry::Vacant(entry) => {
                            entry.insert(MergedField {
                                first: occurrence,
                                others: Vec::new(),
                            });
                        }
                    }
                }
                Selection::InlineFragment(inline_fragment) => {
                    let nested = &inline_fragment.selection_set;
                    if !self.applies(&nested.ty, shape) {
                        continue;
                    }
                    let own = BooleanExpression::from_directives(
                        &inline_fragment.directives,
                        &format!("... on {}", nested.ty),
                    )?;
                    self.collect_into(nested, &condition.clone().and(own), shape, collected)?;
                }
                Selection::FragmentSpread(spread) => {
                    let fragment = self.fragment(&spread.fragment_name)?;
                    if !self.applies(fragment.type_condition(), shape) {
                        continue;
                    }
                    let own = BooleanExpression::from_directives(
                        &spread.directives,
                        &format!("...{}", spread.fragment_name),
                    )?;
                    collected
                        .fragment_spreads
                        .insert(spread.fragment_name.clone());
                    self.collect_into(
                        &fragment.selection_set,
                        &condition.clone().and(own),
                        shape,
                        collected,
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Gathers the type conditions of the inline fragments and fragment spreads selected directly
    /// on a field, looking through nested fragments but not into sub-fields.
    pub(super) fn collect_type_conditions(
        &self,
        selection_set: &'a SelectionSet,
        type_conditions: &mut IndexSet<&'a Name>,
    ) -> Result<(), IrError> {
        for selection in &selection_set.selections {
            match selection {
                Selection::Field(_) => {}
                Selection::InlineFragment(inline_fragment) => {
                    if let Some(type_condition) = &inline_fragment.type_condition {
                        type_conditions.insert(type_condition);
                    }
                    self.collect_type_conditions(&inline_fragment.selection_set, type_conditions)?;
                }
                Selection::FragmentSpread(spread) => {
                    let fragment = self.fragment(&spread.fragment_name)?;
                    type_conditions.insert(fragment.type_condition());
                    self.collect_type_conditions(&fragment.selection_set, type_conditions)?;
                }
            }
        }
        Ok(())
    }
}

/// The named fragments used by a selection set, directly or through other fragments, in the
/// order they are first reached by a depth-first walk.
pub(crate) fn used_fragments<'a>(
    selection_set: &'a SelectionSet,
    fragments: &IndexMap<Name, &'a Node<Fragment>>,
    used: &mut IndexSet<Name>,
) -> Result<(), UserQueryError> {
    for selection in &selection_set.selections {
        match selection {
            Selection::Field(field) => used_fragments(&field.selection_set, fragments, used)?,
            Selection::InlineFragment(inline_fragment) => {
                used_fragments(&inline_fragment.selection_set, fragments, used)?
            }
            Selection::FragmentSpread(spread) => {
                if used.insert(spread.fragment_name.clone()) {
                    let Some(fragment) = fragments.get(&spread.fragment_name).copied() else {
                        return Err(UserQueryError::UnknownFragment(
                            spread.fragment_name.clone(),
                        ));
                    };
                    used_fragments(&fragment.selection_set, fragments, used)?;
                }
            }
        }
    }
    Ok(())
}
