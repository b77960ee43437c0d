use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::schema::ExtendedType;
use indexmap::IndexMap;
use indexmap::IndexSet;

use crate::ir::TypeSet;

/// The concrete object types each composite type of a schema can resolve to at runtime.
///
/// An object type resolves to itself, an interface to the object types implementing it and a
/// union to its members. Sets follow schema declaration order.
#[derive(Debug, Default)]
pub(crate) struct PossibleTypes {
    by_type: IndexMap<Name, IndexSet<Name>>,
    empty: IndexSet<Name>,
}

impl PossibleTypes {
    pub(crate) fn new(schema: &Schema) -> Self {
        let mut by_type: IndexMap<Name, IndexSet<Name>> = IndexMap::new();
        for (name, definition) in &schema.types {
            match definition {
                ExtendedType::Object(object) => {
                    by_type.entry(name.clone()).or_default().insert(name.clone());
                    for interface in &object.implements_interfaces {
                        by_type
                            .entry(interface.name.clone())
                            .or_default()
                            .insert(name.clone());
                    }
                }
                ExtendedType::Union(union_) => {
                    let members = by_type.entry(name.clone()).or_default();
                    for member in &union_.members {
                        members.insert(member.name.clone());
                    }
                }
                _ => {}
            }
        }
        Self {
            by_type,
            empty: IndexSet::new(),
        }
    }

    pub(crate) fn of(&self, type_name: &str) -> &IndexSet<Name> {
        self.by_type.get(type_name).unwrap_or(&self.empty)
    }

    /// Whether every possible type of `sub` is a possible type of `of`.
    pub(crate) fn is_covered_by(&self, sub: &IndexSet<Name>, of: &str) -> bool {
        let of = self.of(of);
        sub.iter().all(|name| of.contains(name))
    }

    /// The object types matching every member of the type set.
    pub(crate) fn of_type_set(&self, type_set: &TypeSet) -> IndexSet<Name> {
        let mut members = type_set.iter();
        let Some(first) = members.next() else {
            return IndexSet::new();
        };
        let mut possible = self.of(first).clone();
        for member in members {
            let of_member = self.of(member);
            possible.retain(|name| of_member.contains(name));
        }
        possible
    }
}
