use std::fmt;

use apollo_compiler::Name;
use apollo_compiler::ast::Value;
use apollo_compiler::executable::DirectiveList;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;

use crate::error::UserQueryError;

/// The condition under which a selection is part of the response.
///
/// Only canonical forms exist: `True`, `False`, a single (possibly negated) variable, or a
/// conjunction of at least two (possibly negated) distinct variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum BooleanExpression {
    True,
    False,
    Variable(VariableCondition),
    And(VariableConditions),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VariableCondition {
    pub name: Name,
    pub negated: bool,
}

/// Two or more conditions on distinct variables, sorted by variable name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VariableConditions(Vec<VariableCondition>);

impl VariableCondition {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            negated: false,
        }
    }

    pub fn not(self) -> Self {
        Self {
            name: self.name,
            negated: !self.negated,
        }
    }
}

impl VariableConditions {
    pub fn iter(&self) -> impl Iterator<Item = &VariableCondition> {
        self.0.iter()
    }
}

impl BooleanExpression {
    pub fn variable(name: Name) -> Self {
        BooleanExpression::Variable(VariableCondition::new(name))
    }

    /// Reads the `@skip` and `@include` directives of one selection.
    ///
    /// Having both is allowed and equivalent to their conjunction. Other directives are ignored.
    pub fn from_directives(
        directives: &DirectiveList,
        selection: &str,
    ) -> Result<Self, UserQueryError> {
        let mut seen: Vec<&Name> = Vec::new();
        let mut conditions = Vec::new();
        for directive in directives.iter() {
            let skip = match directive.name.as_str() {
                "include" => false,
                "skip" => true,
                _ => continue,
            };
            if seen.contains(&&directive.name) {
                return Err(UserQueryError::DuplicateConditionDirective {
                    directive: directive.name.clone(),
                    selection: selection.to_owned(),
                });
            }
            seen.push(&directive.name);

            let [argument] = directive.arguments.as_slice() else {
                return Err(UserQueryError::InvalidConditionArgumentCount {
                    directive: directive.name.clone(),
                    count: directive.arguments.len(),
                });
            };
            let condition = match argument.value.as_ref() {
                Value::Boolean(value) => {
                    if *value != skip {
                        BooleanExpression::True
                    } else {
                        BooleanExpression::False
                    }
                }
                Value::Variable(name) => {
                    let variable = VariableCondition::new(name.clone());
                    BooleanExpression::Variable(if skip { variable.not() } else { variable })
                }
                value => {
                    return Err(UserQueryError::InvalidConditionArgument {
                        directive: directive.name.clone(),
                        value: value.to_string(),
                    });
                }
            };
            conditions.push(condition);
        }
        Ok(Self::all(conditions))
    }

    /// The simplified conjunction of the given expressions.
    ///
    /// An empty conjunction is `True`, `True` members are dropped and any `False` member, or a
    /// variable required both as is and negated, makes the whole expression `False`.
    pub fn all(expressions: impl IntoIterator<Item = BooleanExpression>) -> Self {
        let mut variables: IndexMap<Name, bool> = IndexMap::new();
        for expression in expressions {
            let terms = match expression {
                BooleanExpression::True => continue,
                BooleanExpression::False => return BooleanExpression::False,
                BooleanExpression::Variable(variable) => vec![variable],
                BooleanExpression::And(conjunction) => conjunction.0,
            };
            for VariableCondition { name, negated } in terms {
                match variables.entry(name) {
                    Entry::Occupied(entry) => {
                        if *entry.get() != negated {
                            return BooleanExpression::False;
                        }
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(negated);
                    }
                }
            }
        }
        let mut terms: Vec<VariableCondition> = variables
            .into_iter()
            .map(|(name, negated)| VariableCondition { name, negated })
            .collect();
        terms.sort_by(|left, right| left.name.as_str().cmp(right.name.as_str()));
        match terms.len() {
            0 => BooleanExpression::True,
            1 => BooleanExpression::Variable(terms.remove(0)),
            _ => BooleanExpression::And(VariableConditions(terms)),
        }
    }

    pub fn and(self, other: BooleanExpression) -> Self {
        Self::all([self, other])
    }

    /// Re-normalizes the expression. Canonical expressions are returned unchanged.
    pub fn simplify(self) -> Self {
        Self::all([self])
    }

    /// The strongest canonical expression implied by every one of the given branches.
    ///
    /// This is how the conditions of several selections merged into one field combine: a field
    /// selected unconditionally on any branch is unconditional, branches that can never be
    /// selected do not contribute, and otherwise only the variable terms shared by every branch
    /// are kept.
    pub fn any(branches: impl IntoIterator<Item = BooleanExpression>) -> Self {
        let mut common: Option<Vec<VariableCondition>> = None;
        for branch in branches {
            let terms = match branch {
                BooleanExpression::True => return BooleanExpression::True,
                BooleanExpression::False => continue,
                BooleanExpression::Variable(variable) => vec![variable],
                BooleanExpression::And(conjunction) => conjunction.0,
            };
            common = Some(match common {
                None => terms,
                Some(common) => common
                    .into_iter()
                    .filter(|term| terms.contains(term))
                    .collect(),
            });
        }
        match common {
            None => BooleanExpression::False,
            Some(terms) => Self::all(terms.into_iter().map(BooleanExpression::Variable)),
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, BooleanExpression::True)
    }

    /// The variables referenced by this expression.
    pub fn variables(&self) -> impl Iterator<Item = &Name> {
        let terms: &[VariableCondition] = match self {
            BooleanExpression::True | BooleanExpression::False => &[],
            BooleanExpression::Variable(variable) => std::slice::from_ref(variable),
            BooleanExpression::And(conjunction) => &conjunction.0,
        };
        terms.iter().map(|term| &term.name)
    }
}

impl fmt::Display for VariableCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        write!(f, "${}", self.name)
    }
}

impl fmt::Display for BooleanExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanExpression::True => f.write_str("true"),
            BooleanExpression::False => f.write_str("false"),
            BooleanExpression::Variable(variable) => variable.fmt(f),
            BooleanExpression::And(conjunction) => {
                for (i, term) in conjunction.0.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" && ")?;
                    }
                    term.fmt(f)?;
                }
                Ok(())
            }
        }
    }
}
