//! tally - Incremental recalculation for named formula cells.
//!
//! - [`tally_engine`] - expression evaluator, dependency graph and cell store
//! - [`tally_core`] - document model (values, input parsing) and settings

pub use tally_core::{CellValue, Document, Result, Settings, TallyError};
pub use tally_engine::engine::{
    CellStore, Contents, DependencyGraph, Formula, Lookup, Normalization, evaluate, is_valid_name,
};
pub use tally_engine::{ArithmeticError, EvalError, FormatError, StoreError};
