use std::collections::HashMap;

use tally_engine::engine::{Contents, Lookup};
use tally_engine::{ArithmeticError, EvalError};
use tracing::{debug, debug_span};

use super::Document;
use super::format::format_number;
use crate::error::Result;

/// The computed value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    /// A number entered directly.
    Number(f64),
    /// The exact result of a formula.
    Integer(i64),
    Text(String),
    Error(EvalError),
}

impl CellValue {
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }
}

/// Resolves formula variables from already computed cell values.
struct ValueLookup<'a> {
    values: &'a HashMap<String, CellValue>,
}

impl Lookup for ValueLookup<'_> {
    fn resolve(&self, name: &str) -> std::result::Result<i64, String> {
        match self.values.get(name) {
            None | Some(CellValue::Empty) => Err("cell is empty".to_string()),
            Some(CellValue::Text(_)) => Err("cell holds text".to_string()),
            Some(CellValue::Error(_)) => Err("cell has an error".to_string()),
            Some(CellValue::Integer(n)) => Ok(*n),
            Some(CellValue::Number(n)) => as_integer(*n)
                .ok_or_else(|| format!("{} is not an integer", n)),
        }
    }
}

/// `n` as an `i64` if it is a whole number in range.
fn as_integer(n: f64) -> Option<i64> {
    // i64::MAX is not exactly representable; 2^63 is the first value past it.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if n.is_finite() && n.fract() == 0.0 && (-LIMIT..LIMIT).contains(&n) {
        Some(n as i64)
    } else {
        None
    }
}

impl Document {
    /// Recompute the values of `order`, which must list dependees first.
    pub(crate) fn recalculate(&mut self, order: &[String]) {
        let _span = debug_span!("recalculate", cells = order.len()).entered();
        for name in order {
            let value = self.compute_value(name);
            if value.is_error() {
                debug!(cell = %name, ?value, "formula evaluation failed");
            }
            match value {
                CellValue::Empty => {
                    self.values.remove(name);
                }
                value => {
                    self.values.insert(name.clone(), value);
                }
            }
        }
    }

    /// Evaluate one cell against the current values; `name` is normalized.
    fn compute_value(&self, name: &str) -> CellValue {
        match self.store.get_cell_contents(name) {
            Ok(Contents::Number(n)) => CellValue::Number(n),
            Ok(Contents::Text(s)) if s.is_empty() => CellValue::Empty,
            Ok(Contents::Text(s)) => CellValue::Text(s),
            Ok(Contents::Formula(formula)) => {
                let lookup = ValueLookup {
                    values: &self.values,
                };
                match formula.evaluate(&lookup) {
                    Ok(n) => CellValue::Integer(n),
                    Err(err) => CellValue::Error(err),
                }
            }
            Err(_) => CellValue::Empty,
        }
    }

    /// The computed value of a cell; unset cells are [`CellValue::Empty`].
    pub fn get_cell_value(&self, name: &str) -> Result<CellValue> {
        let name = self.store.normalize_name(name)?;
        Ok(self.values.get(&name).cloned().unwrap_or(CellValue::Empty))
    }

    /// The value of a cell formatted for display.
    pub fn get_cell_display(&self, name: &str) -> Result<String> {
        let display = match self.get_cell_value(name)? {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(n, self.settings.display.decimals),
            CellValue::Integer(n) => n.to_string(),
            CellValue::Text(s) => s,
            CellValue::Error(err) => error_code(&err).to_string(),
        };
        Ok(display)
    }
}

/// Spreadsheet-style code shown in place of a failed value.
fn error_code(err: &EvalError) -> &'static str {
    match err {
        EvalError::Arithmetic(ArithmeticError::DivisionByZero) => "#DIV/0!",
        EvalError::Arithmetic(ArithmeticError::Overflow) => "#NUM!",
        EvalError::Lookup { .. } => "#REF!",
        EvalError::Format(_) => "#ERR!",
    }
}
