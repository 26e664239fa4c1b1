//! Per-row expand/collapse state.

use std::collections::HashSet;
use std::hash::Hash;

/// Tracks expanded rows by their keys.
///
/// Only keys are stored, so the state survives search, sort, pagination and
/// row replacement. A row that disappears and comes back is still expanded.
#[derive(Debug, Clone)]
pub struct ExpandedRows<K: Clone + Eq + Hash> {
    expanded: HashSet<K>,
}

impl<K: Clone + Eq + Hash> Default for ExpandedRows<K> {
    fn default() -> Self {
        Self {
            expanded: HashSet::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> ExpandedRows<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the state of one row. Returns the new state.
    pub fn toggle(&mut self, key: &K) -> bool {
        if self.expanded.remove(key) {
            false
        } else {
            self.expanded.insert(key.clone());
            true
        }
    }

    pub fn is_expanded(&self, key: &K) -> bool {
        self.expanded.contains(key)
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Number of expanded rows, including rows not currently visible.
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}
