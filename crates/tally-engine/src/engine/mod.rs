//! Recalculation engine API.
//!
//! This module provides the core computation engine for named cells:
//!
//! - [`evaluate`], [`Lookup`] - Integer expression evaluation with variable resolution
//! - [`Formula`] - Validated expressions used as cell content
//! - [`DependencyGraph`] - Bidirectional (dependee, dependent) relation
//! - [`CellStore`], [`Contents`] - Transactional cell storage with cycle rejection
//! - [`is_valid_name`], [`Normalization`] - Cell name rules

mod cell;
mod cell_name;
mod cycle;
mod eval;
mod formula;
mod graph;
mod store;
mod token;

pub use cell::Contents;
pub use cell_name::{Normalization, is_valid_name};
pub use cycle::cells_to_recalculate;
pub use eval::{Lookup, evaluate};
pub use formula::Formula;
pub use graph::DependencyGraph;
pub use store::CellStore;
pub use token::{Operator, Token, tokenize};
