//! Transactional cell storage.
//!
//! [`CellStore`] owns the contents of every non-empty cell together with the
//! dependency graph derived from them. Each `set_*` call either commits fully
//! (contents and both graph views updated) or fails and leaves the store
//! exactly as it was.
//!
//! Setting a cell:
//! 1. validates and normalizes the name,
//! 2. provisionally replaces the cell's dependee edges,
//! 3. computes the recalculation order, which detects cycles,
//! 4. on a cycle, restores the previous edges and reports the error,
//! 5. otherwise commits the contents and returns the order.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::StoreError;

use super::cell::Contents;
use super::cell_name::{Normalization, is_valid_name};
use super::cycle::cells_to_recalculate;
use super::formula::Formula;
use super::graph::DependencyGraph;

/// Named cells plus the dependency graph between them.
///
/// Formula variables are brought into the store's [`Normalization`] on the
/// way in, so they always match stored names.
#[derive(Default, Debug, Clone)]
pub struct CellStore {
    cells: HashMap<String, Contents>,
    graph: DependencyGraph,
    normalization: Normalization,
}

impl CellStore {
    /// Create an empty store that upper-cases names.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalization(normalization: Normalization) -> Self {
        CellStore {
            normalization,
            ..Self::default()
        }
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Validate `name` and bring it into canonical form.
    pub fn normalize_name(&self, name: &str) -> Result<String, StoreError> {
        if !is_valid_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.normalization.apply(name))
    }

    /// Contents of `name`, or the empty text if it was never set.
    pub fn get_cell_contents(&self, name: &str) -> Result<Contents, StoreError> {
        let name = self.normalize_name(name)?;
        Ok(self.cells.get(&name).cloned().unwrap_or_default())
    }

    /// Names of every cell currently holding content.
    pub fn names_of_all_nonempty_cells(&self) -> HashSet<String> {
        self.cells.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Set a number; returns the cells to recompute, `name` first.
    pub fn set_cell_number(&mut self, name: &str, number: f64) -> Result<Vec<String>, StoreError> {
        self.set_cell_contents(name, Contents::Number(number))
    }

    /// Set a text value; the empty text removes the cell.
    pub fn set_cell_text(
        &mut self,
        name: &str,
        text: impl Into<String>,
    ) -> Result<Vec<String>, StoreError> {
        self.set_cell_contents(name, Contents::Text(text.into()))
    }

    /// Set a formula; fails without changes if it would close a cycle.
    pub fn set_cell_formula(
        &mut self,
        name: &str,
        formula: Formula,
    ) -> Result<Vec<String>, StoreError> {
        self.set_cell_contents(name, Contents::Formula(formula))
    }

    /// Replace the contents of `name` and return the cells to recompute in
    /// dependee-before-dependent order, starting with `name` itself.
    pub fn set_cell_contents(
        &mut self,
        name: &str,
        contents: Contents,
    ) -> Result<Vec<String>, StoreError> {
        let name = self.normalize_name(name)?;
        let contents = match contents {
            Contents::Formula(formula) => {
                Contents::Formula(formula.renormalized(self.normalization))
            }
            other => other,
        };

        let previous = self.graph.dependees(&name);
        self.graph.replace_dependees(&name, contents.dependees());

        let order = match cells_to_recalculate(&self.graph, &name) {
            Ok(order) => order,
            Err(err) => {
                self.graph.replace_dependees(&name, previous);
                warn!(cell = %name, error = %err, "rejected circular reference");
                return Err(err);
            }
        };

        if contents.is_empty() {
            self.cells.remove(&name);
        } else {
            self.cells.insert(name.clone(), contents);
        }
        debug!(cell = %name, recalculate = order.len(), "committed cell contents");

        Ok(order)
    }

    /// Cells whose formulas reference `name` directly.
    pub fn direct_dependents(&self, name: &str) -> Result<HashSet<String>, StoreError> {
        let name = self.normalize_name(name)?;
        Ok(self.graph.dependents(&name))
    }

    /// Cells referenced directly by the formula in `name`.
    pub fn direct_dependees(&self, name: &str) -> Result<HashSet<String>, StoreError> {
        let name = self.normalize_name(name)?;
        Ok(self.graph.dependees(&name))
    }

    /// Recalculation order for `name` in the current state.
    pub fn cells_to_recalculate(&self, name: &str) -> Result<Vec<String>, StoreError> {
        let name = self.normalize_name(name)?;
        cells_to_recalculate(&self.graph, &name)
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Remove every cell and edge.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.graph.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formula(expr: &str) -> Formula {
        Formula::new(expr).unwrap()
    }

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Every formula cell's dependees match its variables; nothing else has any.
    fn assert_store_consistent(store: &CellStore) {
        store.graph().assert_consistent();
        for name in store.names_of_all_nonempty_cells() {
            let expected: HashSet<String> = store
                .get_cell_contents(&name)
                .unwrap()
                .dependees()
                .into_iter()
                .collect();
            assert_eq!(store.direct_dependees(&name).unwrap(), expected, "{name}");
        }
    }

    #[test]
    fn test_unset_cell_reads_empty() {
        let store = CellStore::new();
        assert_eq!(store.get_cell_contents("A1"), Ok(Contents::empty()));
        assert!(store.names_of_all_nonempty_cells().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_names_rejected_everywhere() {
        let mut store = CellStore::new();
        let invalid = StoreError::InvalidName("1A".to_string());
        assert_eq!(store.get_cell_contents("1A"), Err(invalid.clone()));
        assert_eq!(store.set_cell_number("1A", 1.0), Err(invalid.clone()));
        assert_eq!(store.set_cell_text("1A", "x"), Err(invalid.clone()));
        assert_eq!(store.set_cell_formula("1A", formula("1")), Err(invalid.clone()));
        assert_eq!(store.direct_dependents("1A"), Err(invalid.clone()));
        assert_eq!(store.cells_to_recalculate("1A"), Err(invalid));
        assert!(store.set_cell_number("A", 1.0).is_err());
        assert!(store.set_cell_number("", 1.0).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let mut store = CellStore::new();
        store.set_cell_number("A1", 5.0).unwrap();
        store.set_cell_text("B1", "hello").unwrap();
        store.set_cell_formula("C1", formula("A1 * 2")).unwrap();

        assert_eq!(store.get_cell_contents("A1"), Ok(Contents::Number(5.0)));
        assert_eq!(store.get_cell_contents("B1"), Ok(Contents::from("hello")));
        assert_eq!(store.get_cell_contents("C1"), Ok(Contents::from(formula("A1*2"))));
        assert_eq!(store.names_of_all_nonempty_cells(), set(&["A1", "B1", "C1"]));
        assert_store_consistent(&store);
    }

    #[test]
    fn test_names_are_normalized() {
        let mut store = CellStore::new();
        store.set_cell_number("a1", 1.0).unwrap();
        assert_eq!(store.get_cell_contents("A1"), Ok(Contents::Number(1.0)));
        assert_eq!(store.names_of_all_nonempty_cells(), set(&["A1"]));

        let mut store = CellStore::with_normalization(Normalization::Preserve);
        store.set_cell_number("a1", 1.0).unwrap();
        assert_eq!(store.get_cell_contents("A1"), Ok(Contents::empty()));
    }

    #[test]
    fn test_empty_text_removes_cell() {
        let mut store = CellStore::new();
        store.set_cell_number("A1", 5.0).unwrap();
        store.set_cell_text("A1", "").unwrap();
        assert!(!store.names_of_all_nonempty_cells().contains("A1"));
        assert_eq!(store.get_cell_contents("A1"), Ok(Contents::empty()));
    }

    #[test]
    fn test_overwrite_formula_with_number_drops_edges() {
        let mut store = CellStore::new();
        store.set_cell_formula("B1", formula("A1 + C1")).unwrap();
        assert_eq!(store.direct_dependents("A1"), Ok(set(&["B1"])));

        store.set_cell_number("B1", 3.0).unwrap();
        assert!(store.direct_dependents("A1").unwrap().is_empty());
        assert!(store.graph().is_empty());
        assert_store_consistent(&store);
    }

    #[test]
    fn test_closure_contains_cell_and_all_dependents() {
        let mut store = CellStore::new();
        store.set_cell_formula("B1", formula("A1 * 2")).unwrap();
        store.set_cell_formula("C1", formula("B1 + A1")).unwrap();
        store.set_cell_formula("D1", formula("C1")).unwrap();
        store.set_cell_formula("E1", formula("Z9")).unwrap();

        let order = store.set_cell_number("A1", 1.0).unwrap();
        assert_eq!(order, vec!["A1", "B1", "C1", "D1"]);

        let order = store.set_cell_formula("C1", formula("B1 + 1")).unwrap();
        assert_eq!(order, vec!["C1", "D1"]);
        assert_eq!(store.direct_dependents("A1"), Ok(set(&["B1"])));
        assert_store_consistent(&store);
    }

    #[test]
    fn test_cycle_rejected_and_state_preserved() {
        let mut store = CellStore::new();
        store.set_cell_formula("A1", formula("B1 + 1")).unwrap();
        let graph_before = store.graph().dependents("B1");

        let err = store.set_cell_formula("B1", formula("A1 + 1")).unwrap_err();
        assert!(matches!(err, StoreError::CircularReference { ref cell, .. } if cell == "B1"));

        assert_eq!(store.get_cell_contents("A1"), Ok(Contents::from(formula("B1+1"))));
        assert_eq!(store.get_cell_contents("B1"), Ok(Contents::empty()));
        assert_eq!(store.graph().dependents("B1"), graph_before);
        assert!(!store.graph().has_dependees("B1"));
        assert_eq!(store.graph().size(), 1);
        assert_store_consistent(&store);
    }

    #[test]
    fn test_cycle_rejection_restores_previous_formula_edges() {
        let mut store = CellStore::new();
        store.set_cell_formula("A1", formula("B1 + C1")).unwrap();
        store.set_cell_formula("C1", formula("D1")).unwrap();

        let err = store.set_cell_formula("C1", formula("A1 * 2"));
        assert!(matches!(err, Err(StoreError::CircularReference { .. })));

        assert_eq!(store.get_cell_contents("C1"), Ok(Contents::from(formula("D1"))));
        assert_eq!(store.direct_dependees("C1"), Ok(set(&["D1"])));
        assert_eq!(store.direct_dependents("A1"), Ok(HashSet::new()));
        assert_store_consistent(&store);
    }

    #[test]
    fn test_self_reference_rejected() {
        let mut store = CellStore::new();
        store.set_cell_number("A1", 2.0).unwrap();
        let err = store.set_cell_formula("A1", formula("A1 + 1"));
        assert!(matches!(err, Err(StoreError::CircularReference { .. })));
        assert_eq!(store.get_cell_contents("A1"), Ok(Contents::Number(2.0)));
        assert!(store.graph().is_empty());
    }

    #[test]
    fn test_formula_may_reference_unset_cells() {
        let mut store = CellStore::new();
        let order = store.set_cell_formula("A1", formula("X1 + Y2")).unwrap();
        assert_eq!(order, vec!["A1"]);
        assert_eq!(store.direct_dependents("x1"), Ok(set(&["A1"])));
        assert_eq!(store.names_of_all_nonempty_cells(), set(&["A1"]));
    }

    #[test]
    fn test_clearing_a_referenced_cell_keeps_dependents_edges() {
        let mut store = CellStore::new();
        store.set_cell_number("A1", 1.0).unwrap();
        store.set_cell_formula("B1", formula("A1")).unwrap();

        let order = store.set_cell_text("A1", "").unwrap();
        assert_eq!(order, vec!["A1", "B1"]);
        assert_eq!(store.direct_dependents("A1"), Ok(set(&["B1"])));
        assert_store_consistent(&store);
    }

    #[test]
    fn test_formula_variables_follow_store_normalization() {
        let mut store = CellStore::with_normalization(Normalization::Lower);
        store.set_cell_formula("a1", formula("b1 + 1")).unwrap();
        assert_eq!(store.direct_dependees("a1"), Ok(set(&["b1"])));
        assert_eq!(
            store.get_cell_contents("a1"),
            Ok(Contents::Formula(
                Formula::with_normalization("b1+1", Normalization::Lower).unwrap()
            ))
        );

        let err = store.set_cell_formula("b1", formula("a1 + 1"));
        assert!(matches!(err, Err(StoreError::CircularReference { .. })));
        assert_eq!(store.get_cell_contents("b1"), Ok(Contents::empty()));
        assert_store_consistent(&store);
    }

    #[test]
    fn test_long_chain_recalculates() {
        let mut store = CellStore::new();
        for i in 2..=100_000 {
            store
                .set_cell_formula(&format!("A{i}"), formula(&format!("A{}", i - 1)))
                .unwrap();
        }

        let order = store.set_cell_number("A1", 1.0).unwrap();
        assert_eq!(order.len(), 100_000);
        assert_eq!(order.first().map(String::as_str), Some("A1"));
        assert_eq!(order.last().map(String::as_str), Some("A100000"));

        let err = store.set_cell_formula("A1", formula("A100000"));
        assert!(matches!(err, Err(StoreError::CircularReference { .. })));
        assert_eq!(store.get_cell_contents("A1"), Ok(Contents::Number(1.0)));
    }

    #[test]
    fn test_clear() {
        let mut store = CellStore::new();
        store.set_cell_number("A1", 1.0).unwrap();
        store.set_cell_formula("B1", formula("A1")).unwrap();
        store.clear();
        assert!(store.is_empty());
        assert!(store.graph().is_empty());
        assert_store_consistent(&store);
    }
}
