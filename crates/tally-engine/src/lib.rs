//! tally_engine - Expression evaluator, dependency graph and cell store.

pub mod engine;
pub mod error;

pub use error::{ArithmeticError, EvalError, FormatError, StoreError};
