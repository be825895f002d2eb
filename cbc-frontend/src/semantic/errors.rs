//! Semantic analysis diagnostics
//!
//! Each variant renders to the exact message recorded in the
//! `ErrorReporter`. Types are rendered with their source spelling.

use crate::types::Type;
use thiserror::Error;

/// Type errors and structural errors found by the checker
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("returns an array: {0}")]
    ReturnsArray(String),

    #[error("returns a struct: {0}")]
    ReturnsStruct(String),

    #[error("returns a union: {0}")]
    ReturnsUnion(String),

    #[error("invalid parameter type: {0}")]
    InvalidParameterType(Type),

    #[error("returning value from void function")]
    ReturnValueFromVoid,

    #[error("missing return value")]
    MissingReturnValue,

    #[error("returning incompatible value: {0}")]
    IncompatibleReturn(Type),

    #[error("invalid lhs expression")]
    InvalidLhsExpression,

    #[error("invalid lhs type")]
    InvalidLhsType,

    /// Initialized variable of a type that cannot be assigned by value
    #[error("invalid LHS type: {0}")]
    InvalidVariableType(Type),

    #[error("incompatible type: {0} and {1}")]
    IncompatibleTypes(Type, Type),

    #[error("non-integer argument for unary op: {0}")]
    NotInteger(Type),

    #[error("non-integer argument for unary op: {0}")]
    NotScalar(Type),

    #[error("calling object is not a function")]
    NotCallable,

    #[error("wrong number of arguments: {0}")]
    WrongArgumentCount(usize),

    #[error("invalid argument type: {0}")]
    InvalidArgumentType(Type),

    #[error("is not indexable: {0}")]
    NotIndexable(Type),

    #[error("is not struct/union: {0}")]
    NotComposed(Type),

    #[error("{0} does not have member {1}")]
    NoSuchMember(Type, String),

    #[error("dereferencing non-pointer expression: {0}")]
    NotDereferable(Type),

    #[error("invalid LHS expression for &")]
    NotAddressable,
}

/// Legal conversions that change the value's representation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticWarning {
    #[error("implicit cast from {from} to {to}")]
    ImplicitCast { from: Type, to: Type },

    #[error("incompatible cast from {from} to {to}")]
    IncompatibleCast { from: Type, to: Type },
}
