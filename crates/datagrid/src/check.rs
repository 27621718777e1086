//! Selection tracker.
//!
//! Maintains the checked and indeterminate row-key sets with tree cascade
//! semantics: checking a row checks its whole subtree, and each ancestor is
//! recomputed bottom-up — checked when all of its children are checked,
//! indeterminate when only some are, unchecked otherwise. The two sets are
//! disjoint at all times; only non-leaf rows can become indeterminate.
//!
//! Operations on keys absent from the index are silent no-ops: selection
//! state is best-effort against possibly-stale key references, e.g. after
//! an async data reload swapped the rows out.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use treemate::{RowData, TreeMate};

/// Which rows `check_all` / `uncheck_all` operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckAllScope {
    /// The whole indexed data set.
    #[default]
    AllRows,
    /// Only the rows on the current page.
    CurrentPage,
}

/// Tri-state check status of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Not checked.
    Unchecked,
    /// Fully checked.
    Checked,
    /// Some but not all descendants checked (non-leaf rows only).
    Indeterminate,
}

/// Checked/indeterminate key bookkeeping.
#[derive(Debug, Clone)]
pub struct CheckController<K> {
    checked: HashSet<K>,
    indeterminate: HashSet<K>,
    cascade: bool,
}

impl<K> Default for CheckController<K> {
    fn default() -> Self {
        Self {
            checked: HashSet::new(),
            indeterminate: HashSet::new(),
            cascade: true,
        }
    }
}

impl<K> CheckController<K>
where
    K: Clone + Eq + Hash + fmt::Debug,
{
    /// Creates an empty controller.
    ///
    /// With `cascade` off, check/uncheck touch only the named key — no
    /// downward propagation and no ancestor recomputation (flat selection
    /// over tree data).
    #[must_use]
    pub fn new(cascade: bool) -> Self {
        Self {
            checked: HashSet::new(),
            indeterminate: HashSet::new(),
            cascade,
        }
    }

    /// Returns whether a key is checked.
    #[must_use]
    pub fn is_checked(&self, key: &K) -> bool {
        self.checked.contains(key)
    }

    /// Returns whether a key is indeterminate.
    #[must_use]
    pub fn is_indeterminate(&self, key: &K) -> bool {
        self.indeterminate.contains(key)
    }

    /// Returns the tri-state status of a key.
    #[must_use]
    pub fn status(&self, key: &K) -> CheckStatus {
        if self.checked.contains(key) {
            CheckStatus::Checked
        } else if self.indeterminate.contains(key) {
            CheckStatus::Indeterminate
        } else {
            CheckStatus::Unchecked
        }
    }

    /// Iterates over the checked keys (unspecified order).
    pub fn checked_keys(&self) -> impl Iterator<Item = &K> {
        self.checked.iter()
    }

    /// Iterates over the indeterminate keys (unspecified order).
    pub fn indeterminate_keys(&self) -> impl Iterator<Item = &K> {
        self.indeterminate.iter()
    }

    /// Number of checked keys.
    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    /// Checks a key, cascading to descendants and recomputing ancestors.
    ///
    /// Unknown keys are ignored.
    pub fn check<R>(&mut self, key: &K, tree: &TreeMate<R>)
    where
        R: RowData<Key = K>,
    {
        if !tree.contains(key) {
            return;
        }
        self.mark_checked(key.clone());
        if !self.cascade {
            return;
        }
        for descendant in tree.descendant_keys(key) {
            self.mark_checked(descendant);
        }
        self.update_ancestors(key, tree);
    }

    /// Unchecks a key, cascading to descendants and recomputing ancestors.
    ///
    /// Unknown keys are ignored.
    pub fn uncheck<R>(&mut self, key: &K, tree: &TreeMate<R>)
    where
        R: RowData<Key = K>,
    {
        if !tree.contains(key) {
            return;
        }
        self.mark_unchecked(key);
        if !self.cascade {
            return;
        }
        for descendant in tree.descendant_keys(key) {
            self.mark_unchecked(&descendant);
        }
        self.update_ancestors(key, tree);
    }

    /// Checks every indexed row.
    pub fn check_all<R>(&mut self, tree: &TreeMate<R>)
    where
        R: RowData<Key = K>,
    {
        self.indeterminate.clear();
        self.checked.extend(tree.keys().cloned());
    }

    /// Unchecks every key, known or stale.
    pub fn uncheck_all(&mut self) {
        self.checked.clear();
        self.indeterminate.clear();
    }

    /// Checks each of the given keys (used for page-scoped select-all).
    pub fn check_keys<'a, R, I>(&mut self, keys: I, tree: &TreeMate<R>)
    where
        R: RowData<Key = K>,
        K: 'a,
        I: IntoIterator<Item = &'a K>,
    {
        for key in keys {
            self.check(key, tree);
        }
    }

    /// Unchecks each of the given keys.
    pub fn uncheck_keys<'a, R, I>(&mut self, keys: I, tree: &TreeMate<R>)
    where
        R: RowData<Key = K>,
        K: 'a,
        I: IntoIterator<Item = &'a K>,
    {
        for key in keys {
            self.uncheck(key, tree);
        }
    }

    /// Replaces the checked set wholesale and renormalizes against the
    /// index (controlled-state seeding).
    pub fn replace<R, I>(&mut self, keys: I, tree: &TreeMate<R>)
    where
        R: RowData<Key = K>,
        I: IntoIterator<Item = K>,
    {
        self.uncheck_all();
        for key in keys {
            self.check(&key, tree);
        }
    }

    fn mark_checked(&mut self, key: K) {
        self.indeterminate.remove(&key);
        self.checked.insert(key);
    }

    fn mark_unchecked(&mut self, key: &K) {
        self.checked.remove(key);
        self.indeterminate.remove(key);
    }

    /// Recomputes the status of each ancestor of `key`, nearest first.
    ///
    /// Walks the ancestor chain only, not the whole tree: sibling subtrees
    /// are untouched by the triggering operation, so each ancestor's status
    /// follows from its direct children's statuses.
    fn update_ancestors<R>(&mut self, key: &K, tree: &TreeMate<R>)
    where
        R: RowData<Key = K>,
    {
        for ancestor in tree.ancestor_keys(key) {
            let Some(node) = tree.get(&ancestor) else {
                continue;
            };
            let mut all = true;
            let mut any = false;
            for &child in &node.children {
                let child_key = &tree.node(child).key;
                if self.checked.contains(child_key) {
                    any = true;
                } else {
                    all = false;
                    if self.indeterminate.contains(child_key) {
                        any = true;
                    }
                }
            }

            if all {
                self.mark_checked(ancestor);
            } else if any {
                self.checked.remove(&ancestor);
                self.indeterminate.insert(ancestor);
            } else {
                self.mark_unchecked(&ancestor);
            }
        }
    }
}
