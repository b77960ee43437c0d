//! Errors raised while building the intermediate representation.
//!
//! Every error is fatal: a failure anywhere aborts the whole build and no partial IR is returned.

use apollo_compiler::Name;
use thiserror::Error;

use crate::ir::IrOperationType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrError {
    /// The schema has no root type for the kind of an operation.
    #[error("cannot find the root type for {operation_type} `{operation}`")]
    MissingRootType {
        operation: Name,
        operation_type: IrOperationType,
    },
    #[error(transparent)]
    UserQuery(#[from] UserQueryError),
    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

/// Errors in the user's operations and fragments that upstream validation does not reject.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserQueryError {
    #[error("anonymous operations are not supported")]
    AnonymousOperation,
    #[error("duplicate @{directive} directive on `{selection}`")]
    DuplicateConditionDirective { directive: Name, selection: String },
    #[error("wrong number of arguments for @{directive} directive: {count}")]
    InvalidConditionArgumentCount { directive: Name, count: usize },
    #[error("cannot pass `{value}` to @{directive} directive")]
    InvalidConditionArgument { directive: Name, value: String },
    #[error(
        "variable `${variable}` is used as both `{first}` and `{second}` in fragment `{fragment}`"
    )]
    AmbiguousVariableType {
        fragment: Name,
        variable: Name,
        first: String,
        second: String,
    },
    #[error(
        "variable `${variable}` in fragment `{fragment}` is nested in a custom scalar value, its type cannot be inferred"
    )]
    UntypedVariable { fragment: Name, variable: Name },
    #[error("unknown fragment `{0}`")]
    UnknownFragment(Name),
    #[error("unknown argument `{argument}` on field `{field}`")]
    UnknownArgument { field: Name, argument: Name },
    #[error("unknown type `{0}`")]
    UnknownType(Name),
}

/// A literal or default value whose shape cannot satisfy its expected type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("expected a non-null `{expected}`, found null")]
    NullInNonNull { expected: String },
    #[error("expected a value of type `{expected}`, found `{value}`")]
    TypeMismatch { expected: String, value: String },
    #[error("`{value}` is not a valid {expected}")]
    InvalidNumber { expected: Name, value: String },
    #[error("input object `{input_object}` has no field `{field}`")]
    UnknownInputField { input_object: Name, field: Name },
    #[error("missing required field `{field}` on input object `{input_object}`")]
    MissingInputField { input_object: Name, field: Name },
    #[error("field `{field}` is given more than once for input object `{input_object}`")]
    DuplicateInputField { input_object: Name, field: Name },
    #[error("unknown input type `{0}`")]
    UnknownType(Name),
}
