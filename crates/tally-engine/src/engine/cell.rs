//! Cell content.
//!
//! A cell holds exactly one of a number, a text value or a [`Formula`]. The
//! empty text stands for "no content": the store never keeps a cell whose
//! text is empty.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::formula::Formula;

/// The content stored in a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Contents {
    Number(f64),
    Text(String),
    Formula(Formula),
}

impl Contents {
    /// The content of a cell that was never set.
    pub fn empty() -> Contents {
        Contents::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Contents::Text(s) if s.is_empty())
    }

    /// The names this content references; only formulas reference anything.
    pub fn dependees(&self) -> Vec<String> {
        match self {
            Contents::Formula(formula) => formula.variables().iter().cloned().collect(),
            Contents::Number(_) | Contents::Text(_) => Vec::new(),
        }
    }
}

impl Default for Contents {
    fn default() -> Self {
        Contents::empty()
    }
}

impl From<f64> for Contents {
    fn from(n: f64) -> Self {
        Contents::Number(n)
    }
}

impl From<&str> for Contents {
    fn from(s: &str) -> Self {
        Contents::Text(s.to_string())
    }
}

impl From<String> for Contents {
    fn from(s: String) -> Self {
        Contents::Text(s)
    }
}

impl From<Formula> for Contents {
    fn from(formula: Formula) -> Self {
        Contents::Formula(formula)
    }
}

impl fmt::Display for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contents::Number(n) => write!(f, "{n}"),
            Contents::Text(s) => f.write_str(s),
            Contents::Formula(formula) => write!(f, "={formula}"),
        }
    }
}
