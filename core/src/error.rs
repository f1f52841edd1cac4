//! Error types for MBT core.

use thiserror::Error;

/// Errors raised while parsing predicate text such as `balance(X, 100)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The predicate text has no name before the argument list.
    #[error("predicate '{text}' has no name")]
    MissingName { text: String },

    /// An opening parenthesis was never closed.
    #[error("unclosed argument list in '{text}'")]
    UnclosedArguments { text: String },

    /// Characters follow the closing parenthesis.
    #[error("unexpected trailing input '{trailing}' in '{text}'")]
    TrailingInput { text: String, trailing: String },

    /// An argument between two commas is empty.
    #[error("empty argument at position {position} in '{text}'")]
    EmptyArgument { text: String, position: usize },
}

impl ParseError {
    pub fn missing_name(text: impl Into<String>) -> Self {
        Self::MissingName { text: text.into() }
    }

    pub fn unclosed_arguments(text: impl Into<String>) -> Self {
        Self::UnclosedArguments { text: text.into() }
    }

    pub fn trailing_input(text: impl Into<String>, trailing: impl Into<String>) -> Self {
        Self::TrailingInput {
            text: text.into(),
            trailing: trailing.into(),
        }
    }

    pub fn empty_argument(text: impl Into<String>, position: usize) -> Self {
        Self::EmptyArgument {
            text: text.into(),
            position,
        }
    }
}

/// Reasons a predicate pattern fails to unify with a tuple.
///
/// Unification failures are never fatal: lookups treat them as a signal to
/// try the next candidate mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    /// Pattern and tuple have different lengths.
    #[error("arity mismatch: pattern has {expected} arguments, tuple has {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// A constant in the pattern differs from the tuple value at that position.
    #[error("constant '{expected}' does not match '{actual}' at position {position}")]
    ConstantMismatch {
        position: usize,
        expected: String,
        actual: String,
    },

    /// A repeated variable would be bound to two different values.
    #[error("variable '{variable}' bound to both '{first}' and '{second}'")]
    InconsistentBinding {
        variable: String,
        first: String,
        second: String,
    },
}

impl UnifyError {
    pub fn arity_mismatch(expected: usize, actual: usize) -> Self {
        Self::ArityMismatch { expected, actual }
    }

    pub fn constant_mismatch(
        position: usize,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ConstantMismatch {
            position,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn inconsistent_binding(
        variable: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::InconsistentBinding {
            variable: variable.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}

/// Result type for predicate parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for unification.
pub type UnifyResult<T> = Result<T, UnifyError>;
