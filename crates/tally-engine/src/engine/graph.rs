//! Dependency graph between named cells.
//!
//! Stores the set of ordered pairs `(dependee, dependent)`, meaning "the
//! dependent's value depends on the dependee's value".
//!
//! # Edge Direction
//!
//! ```text
//! A -> B  means  "B depends on A"  (A is a dependee of B, B a dependent of A)
//! ```
//!
//! # Invariants
//!
//! 1. **Mirror consistency:** `t` is in `dependents[s]` iff `s` is in `dependees[t]`.
//! 2. **No dangling entries:** empty sets are removed, not stored.
//! 3. **Edge count:** `size` is the number of distinct pairs.

use std::collections::{HashMap, HashSet};

use tracing::trace;

/// Bidirectional (dependee, dependent) relation over names.
#[derive(Default, Debug, Clone)]
pub struct DependencyGraph {
    /// For each dependee, the names that depend on it.
    dependents: HashMap<String, HashSet<String>>,
    /// For each dependent, the names it depends on.
    dependees: HashMap<String, HashSet<String>>,
    size: usize,
}

impl DependencyGraph {
    /// Create an empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct edges.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of names that depend on `dependee`.
    pub fn dependent_count(&self, dependee: &str) -> usize {
        self.dependents.get(dependee).map_or(0, HashSet::len)
    }

    /// Number of names `dependent` depends on.
    pub fn dependee_count(&self, dependent: &str) -> usize {
        self.dependees.get(dependent).map_or(0, HashSet::len)
    }

    pub fn has_dependents(&self, name: &str) -> bool {
        self.dependents.contains_key(name)
    }

    pub fn has_dependees(&self, name: &str) -> bool {
        self.dependees.contains_key(name)
    }

    /// Snapshot of the names that depend on `name`.
    pub fn dependents(&self, name: &str) -> HashSet<String> {
        self.dependents.get(name).cloned().unwrap_or_default()
    }

    /// Snapshot of the names `name` depends on.
    pub fn dependees(&self, name: &str) -> HashSet<String> {
        self.dependees.get(name).cloned().unwrap_or_default()
    }

    /// Borrowing iterator over the dependents of `name`, for traversals.
    pub(crate) fn iter_dependents<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = &'a str> + use<'a> {
        self.dependents
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Add the edge `(dependee, dependent)`. Adding an existing edge is a no-op.
    pub fn add_dependency(&mut self, dependee: &str, dependent: &str) {
        let inserted = self
            .dependents
            .entry(dependee.to_string())
            .or_default()
            .insert(dependent.to_string());
        if !inserted {
            return;
        }
        self.dependees
            .entry(dependent.to_string())
            .or_default()
            .insert(dependee.to_string());
        self.size += 1;
        trace!(dependee, dependent, "added dependency");
    }

    /// Remove the edge `(dependee, dependent)` if present.
    pub fn remove_dependency(&mut self, dependee: &str, dependent: &str) {
        if !remove_from(&mut self.dependents, dependee, dependent) {
            return;
        }
        remove_from(&mut self.dependees, dependent, dependee);
        self.size -= 1;
        trace!(dependee, dependent, "removed dependency");
    }

    /// Make `new_dependents` exactly the set of names that depend on `name`.
    pub fn replace_dependents<I, S>(&mut self, name: &str, new_dependents: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let new: HashSet<String> = new_dependents.into_iter().map(Into::into).collect();
        for old in self.dependents(name) {
            if !new.contains(&old) {
                self.remove_dependency(name, &old);
            }
        }
        for dependent in &new {
            self.add_dependency(name, dependent);
        }
    }

    /// Make `new_dependees` exactly the set of names `name` depends on.
    pub fn replace_dependees<I, S>(&mut self, name: &str, new_dependees: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let new: HashSet<String> = new_dependees.into_iter().map(Into::into).collect();
        for old in self.dependees(name) {
            if !new.contains(&old) {
                self.remove_dependency(&old, name);
            }
        }
        for dependee in &new {
            self.add_dependency(dependee, name);
        }
    }

    /// Remove every edge.
    pub fn clear(&mut self) {
        self.dependents.clear();
        self.dependees.clear();
        self.size = 0;
    }

    /// Verify all graph invariants. Panics with a description on violation.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut edges = 0;
        for (dependee, dependents) in &self.dependents {
            assert!(!dependents.is_empty(), "Empty dependents set stored for {dependee}");
            for dependent in dependents {
                assert!(
                    self.dependees
                        .get(dependent)
                        .is_some_and(|s| s.contains(dependee)),
                    "Missing dependee edge: {dependent} should have {dependee} in dependees"
                );
                edges += 1;
            }
        }
        let mut mirrored = 0;
        for (dependent, dependees) in &self.dependees {
            assert!(!dependees.is_empty(), "Empty dependees set stored for {dependent}");
            for dependee in dependees {
                assert!(
                    self.dependents
                        .get(dependee)
                        .is_some_and(|s| s.contains(dependent)),
                    "Missing dependent edge: {dependee} should have {dependent} in dependents"
                );
                mirrored += 1;
            }
        }
        assert_eq!(edges, self.size, "size does not match dependents view");
        assert_eq!(mirrored, self.size, "size does not match dependees view");
    }
}

/// Remove `value` from `map[key]`, dropping the entry once it is empty.
fn remove_from(map: &mut HashMap<String, HashSet<String>>, key: &str, value: &str) -> bool {
    let Some(set) = map.get_mut(key) else {
        return false;
    };
    let removed = set.remove(value);
    if set.is_empty() {
        map.remove(key);
    }
    removed
}
