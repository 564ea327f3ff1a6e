use std::collections::HashSet;

use tally_engine::engine::{Contents, Formula};
use tracing::debug;

use super::Document;
use crate::error::Result;

impl Document {
    /// Parse user input into cell contents.
    /// - Empty string or whitespace -> empty text (clears the cell)
    /// - Starts with '=' -> Formula (without the '=')
    /// - Quoted string -> Text (without quotes)
    /// - Valid number -> Number
    /// - Otherwise -> Text
    pub fn parse_input(&self, input: &str) -> Result<Contents> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Contents::empty());
        }

        if let Some(expression) = trimmed.strip_prefix('=') {
            let formula = Formula::with_normalization(expression, self.store.normalization())?;
            return Ok(Contents::Formula(formula));
        }

        if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
            let text = &trimmed[1..trimmed.len() - 1];
            return Ok(Contents::Text(text.to_string()));
        }

        if let Ok(n) = trimmed.parse::<f64>() {
            return Ok(Contents::Number(n));
        }

        Ok(Contents::Text(trimmed.to_string()))
    }

    /// Set a cell from user input and recompute everything that depends on it.
    /// Returns the recomputed cells in evaluation order.
    ///
    /// On error (invalid name, malformed formula, circular reference) the
    /// document is left unchanged.
    pub fn set_cell_from_input(&mut self, name: &str, input: &str) -> Result<Vec<String>> {
        let contents = self.parse_input(input)?;
        self.set_cell_contents(name, contents)
    }

    /// Set a cell's contents and recompute everything that depends on it.
    pub fn set_cell_contents(&mut self, name: &str, contents: Contents) -> Result<Vec<String>> {
        let order = self.store.set_cell_contents(name, contents)?;
        self.modified = true;
        debug!(cells = ?order, "cell changed");
        self.recalculate(&order);
        Ok(order)
    }

    /// Remove a cell's contents.
    pub fn clear_cell(&mut self, name: &str) -> Result<Vec<String>> {
        self.set_cell_contents(name, Contents::empty())
    }

    pub fn get_cell_contents(&self, name: &str) -> Result<Contents> {
        Ok(self.store.get_cell_contents(name)?)
    }

    /// The input text that reproduces this cell through `set_cell_from_input`.
    pub fn cell_input(&self, name: &str) -> Result<String> {
        let input = match self.store.get_cell_contents(name)? {
            Contents::Number(n) => n.to_string(),
            Contents::Formula(formula) => format!("={}", formula),
            Contents::Text(s) => {
                let ambiguous = s.trim() != s
                    || s.starts_with('=')
                    || (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
                    || s.parse::<f64>().is_ok();
                if ambiguous { format!("\"{}\"", s) } else { s }
            }
        };
        Ok(input)
    }

    pub fn names_of_all_nonempty_cells(&self) -> HashSet<String> {
        self.store.names_of_all_nonempty_cells()
    }

    /// Cells whose formulas reference `name` directly.
    pub fn direct_dependents(&self, name: &str) -> Result<HashSet<String>> {
        Ok(self.store.direct_dependents(name)?)
    }
}
