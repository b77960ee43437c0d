use std::fmt;
use std::sync::Arc;

use apollo_compiler::Name;
use itertools::Itertools;
use serde::Serialize;

/// A set of type names narrowing the static type of a field for one generated shape.
///
/// Names are kept sorted so that two type sets holding the same names are equal and hash the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeSet(Vec<Name>);

impl TypeSet {
    /// The type set of a base shape: the field's own type and nothing else.
    pub fn single(name: Name) -> Self {
        Self(vec![name])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|member| member.as_str() == name)
    }

    pub fn is_subset(&self, other: &TypeSet) -> bool {
        self.0.iter().all(|name| other.contains(name.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Name> {
        self.0.iter()
    }

    pub(crate) fn with(&self, name: Name) -> Self {
        self.iter().cloned().chain(std::iter::once(name)).collect()
    }
}

impl FromIterator<Name> for TypeSet {
    fn from_iter<T: IntoIterator<Item = Name>>(iter: T) -> Self {
        let mut names: Vec<Name> = iter.into_iter().collect();
        names.sort_by(|left, right| left.as_str().cmp(right.as_str()));
        names.dedup();
        Self(names)
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PathElement {
    pub type_set: TypeSet,
    pub field_type: Name,
    pub response_name: Name,
}

/// What a [`ModelPath`] is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ModelPathRoot {
    /// The generated interface of an operation shape that other shapes of the same operation
    /// implement.
    OperationInterface,
    OperationImplementation,
    Fragment,
}

/// A stable address for a generated shape, used to derive collision-free identifiers.
///
/// Paths are immutable and shared along many recursive branches: [`ModelPath::append`] returns a
/// new path and leaves `self` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModelPath {
    file_name: Arc<str>,
    root: ModelPathRoot,
    elements: Arc<[PathElement]>,
}

impl ModelPath {
    pub fn new(file_name: impl Into<Arc<str>>, root: ModelPathRoot) -> Self {
        Self {
            file_name: file_name.into(),
            root,
            elements: Arc::from(Vec::new()),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn root(&self) -> ModelPathRoot {
        self.root
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn append(&self, element: PathElement) -> Self {
        let elements: Vec<PathElement> = self
            .elements
            .iter()
            .cloned()
            .chain(std::iter::once(element))
            .collect();
        Self {
            file_name: self.file_name.clone(),
            root: self.root,
            elements: elements.into(),
        }
    }

    pub fn with_root(&self, root: ModelPathRoot) -> Self {
        Self {
            file_name: self.file_name.clone(),
            root,
            elements: self.elements.clone(),
        }
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?}", self.file_name, self.root)?;
        for element in self.elements.iter() {
            write!(
                f,
                ".{}{}<{}>",
                element.response_name, element.type_set, element.field_type
            )?;
        }
        Ok(())
    }
}
