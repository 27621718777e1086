//! Expansion tracker.
//!
//! Maintains the set of expanded row keys for tree tables. Unlike
//! selection, expansion has no cascade: expanding a parent does not expand
//! its grandchildren. Keys only enter the set if their node actually has
//! children, and stale keys are silent no-ops.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use treemate::{RowData, TreeMate};

/// Expanded-key bookkeeping.
#[derive(Debug, Clone)]
pub struct ExpandController<K> {
    expanded: HashSet<K>,
}

impl<K> Default for ExpandController<K> {
    fn default() -> Self {
        Self {
            expanded: HashSet::new(),
        }
    }
}

impl<K> ExpandController<K>
where
    K: Clone + Eq + Hash + fmt::Debug,
{
    /// Creates an empty controller (everything collapsed).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a key is expanded.
    #[must_use]
    pub fn is_expanded(&self, key: &K) -> bool {
        self.expanded.contains(key)
    }

    /// Iterates over the expanded keys (unspecified order).
    pub fn expanded_keys(&self) -> impl Iterator<Item = &K> {
        self.expanded.iter()
    }

    /// Expands a key. Unknown keys and leaves are ignored.
    pub fn expand<R>(&mut self, key: &K, tree: &TreeMate<R>)
    where
        R: RowData<Key = K>,
    {
        match tree.get(key) {
            Some(node) if !node.is_leaf() => {
                self.expanded.insert(key.clone());
            }
            _ => {}
        }
    }

    /// Collapses a key. Always succeeds, even for stale keys.
    pub fn collapse(&mut self, key: &K) {
        self.expanded.remove(key);
    }

    /// Toggles a key and returns whether it is expanded afterwards.
    pub fn toggle<R>(&mut self, key: &K, tree: &TreeMate<R>) -> bool
    where
        R: RowData<Key = K>,
    {
        if self.expanded.contains(key) {
            self.expanded.remove(key);
            false
        } else {
            self.expand(key, tree);
            self.expanded.contains(key)
        }
    }

    /// Expands every key with children.
    pub fn expand_all<R>(&mut self, tree: &TreeMate<R>)
    where
        R: RowData<Key = K>,
    {
        self.expanded
            .extend(tree.iter().filter(|n| !n.is_leaf()).map(|n| n.key.clone()));
    }

    /// Collapses everything.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Replaces the expanded set wholesale (controlled-state seeding),
    /// dropping keys the index does not know or that are leaves.
    pub fn replace<R, I>(&mut self, keys: I, tree: &TreeMate<R>)
    where
        R: RowData<Key = K>,
        I: IntoIterator<Item = K>,
    {
        self.expanded.clear();
        for key in keys {
            self.expand(&key, tree);
        }
    }
}
