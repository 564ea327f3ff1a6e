//! Recalculation order and circular dependency detection.
//!
//! When a cell changes, every cell that depends on it (directly or through
//! other cells) must be recomputed, dependees first. This module walks the
//! dependents relation depth-first from the changed cell and returns the
//! reached cells in reverse post-order, which is a topological order. A cell
//! reached again while it is still on the active path closes a cycle
//! (e.g., A1 references B1, B1 references C1, C1 references A1).

use std::collections::HashMap;

use crate::error::StoreError;

use super::DependencyGraph;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

/// Cells to recompute after `start` changed, `start` first.
///
/// Fails with [`StoreError::CircularReference`] if a cycle is reachable from
/// `start`; the error carries the path that closes it.
pub fn cells_to_recalculate(
    graph: &DependencyGraph,
    start: &str,
) -> Result<Vec<String>, StoreError> {
    match visit(graph, start) {
        Ok(order) => Ok(order.into_iter().map(str::to_string).collect()),
        Err(cycle) => Err(StoreError::CircularReference {
            cell: start.to_string(),
            cycle: cycle.into_iter().map(str::to_string).collect(),
        }),
    }
}

/// Iterative DFS; each frame holds a cell and its not yet visited dependents.
fn visit<'a>(
    graph: &'a DependencyGraph,
    start: &'a str,
) -> Result<Vec<&'a str>, Vec<&'a str>> {
    let mut marks: HashMap<&'a str, Mark> = HashMap::new();
    let mut order = Vec::new();
    let mut stack = vec![(start, graph.iter_dependents(start))];
    marks.insert(start, Mark::OnPath);

    while let Some(frame) = stack.last_mut() {
        let current = frame.0;
        let Some(next) = frame.1.next() else {
            stack.pop();
            marks.insert(current, Mark::Done);
            order.push(current);
            continue;
        };

        match marks.get(next) {
            Some(Mark::Done) => {}
            Some(Mark::OnPath) => {
                let from = stack.iter().position(|(name, _)| *name == next).unwrap_or(0);
                let mut cycle: Vec<&'a str> =
                    stack[from..].iter().map(|(name, _)| *name).collect();
                cycle.push(next);
                return Err(cycle);
            }
            None => {
                marks.insert(next, Mark::OnPath);
                stack.push((next, graph.iter_dependents(next)));
            }
        }
    }

    order.reverse();
    Ok(order)
}
