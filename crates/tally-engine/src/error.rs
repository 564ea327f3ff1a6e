//! Error types for the Tally engine.

use thiserror::Error;

/// A malformed expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Expression is empty")]
    Empty,

    #[error("Illegal token `{0}`")]
    IllegalToken(String),

    #[error("Mismatched parentheses")]
    MismatchedParentheses,

    #[error("Implied multiplication after `)` is not supported")]
    ImpliedMultiplication,

    #[error("Missing operand for `{0}`")]
    MissingOperand(char),

    #[error("Unexpected `{token}` after `{after}`")]
    UnexpectedToken { token: String, after: String },

    #[error("Expression cannot start with `{0}`")]
    InvalidStart(String),

    #[error("Expression cannot end with `{0}`")]
    InvalidEnd(String),

    #[error("Expression does not reduce to a single value")]
    Unbalanced,
}

/// Integer arithmetic that has no result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Integer overflow")]
    Overflow,
}

/// Errors that can occur while evaluating an expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    #[error("Cannot resolve `{name}`: {reason}")]
    Lookup { name: String, reason: String },
}

/// Errors reported by the cell store. A failed call leaves the store unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid cell name `{0}`")]
    InvalidName(String),

    #[error("Circular dependency detected at {cell}: {}", .cycle.join(" -> "))]
    CircularReference { cell: String, cycle: Vec<String> },
}
