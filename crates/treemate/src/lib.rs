#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Treemate
//!
//! An arena-backed index over flat or nested row data, providing O(1)
//! key-based lookup plus parent/ancestor/descendant traversal. It is the
//! data backbone for table components that need tree-aware filtering,
//! selection cascade, and row expansion.
//!
//! Rows implement [`RowData`] to supply their identity key and (optionally)
//! their children. The index is rebuilt wholesale whenever the row
//! collection changes; there is no incremental diffing, which keeps the
//! structure trivially consistent at in-browser/table data sizes.
//!
//! Parent links are stored as arena indices ([`NodeId`]), not references,
//! so the tree has no ownership cycles and nodes stay freely movable.
//!
//! # Example
//!
//! ```rust
//! use treemate::{RowData, TreeMate};
//!
//! #[derive(Clone)]
//! struct Item {
//!     id: u32,
//!     children: Vec<Item>,
//! }
//!
//! impl RowData for Item {
//!     type Key = u32;
//!
//!     fn key(&self) -> u32 {
//!         self.id
//!     }
//!
//!     fn children(&self) -> &[Self] {
//!         &self.children
//!     }
//! }
//!
//! let rows = vec![Item {
//!     id: 1,
//!     children: vec![Item { id: 2, children: vec![] }],
//! }];
//!
//! let tree = TreeMate::from_rows(&rows);
//! assert!(tree.get(&2).is_some());
//! assert_eq!(tree.ancestor_keys(&2), vec![1]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use thiserror::Error;

/// Identifier of a node within one [`TreeMate`] arena.
///
/// Ids are only meaningful for the tree that produced them; after a rebuild
/// all previously obtained ids are stale.
pub type NodeId = usize;

/// Trait for rows that can be indexed.
///
/// The `key` method is the caller-supplied identity function: keys must be
/// unique across the whole data set, nested children included. Duplicate
/// keys are tolerated by [`TreeMate::from_rows`] (last write wins, with a
/// logged warning) but break selection/expansion bookkeeping, so they
/// should be treated as a caller bug.
pub trait RowData: Clone {
    /// Identity type for rows.
    type Key: Clone + Eq + Hash + fmt::Debug;

    /// Returns the unique key of this row.
    fn key(&self) -> Self::Key;

    /// Returns the child rows, if any. Defaults to a leaf.
    fn children(&self) -> &[Self] {
        &[]
    }
}

/// Error returned by [`TreeMate::try_from_rows`] when two rows share a key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("duplicate row key: {key}")]
pub struct DuplicateKeyError {
    /// Debug rendering of the offending key.
    pub key: String,
}

/// A row wrapped with its position in the tree.
#[derive(Debug, Clone)]
pub struct IndexedNode<R: RowData> {
    /// Arena id of this node.
    pub id: NodeId,
    /// The row's key, as returned by [`RowData::key`].
    pub key: R::Key,
    /// The row itself.
    pub row: R,
    /// Arena id of the parent node, `None` for top-level rows.
    pub parent: Option<NodeId>,
    /// Arena ids of the children, in row order. Empty for leaves.
    pub children: Vec<NodeId>,
    /// Nesting depth; top-level rows are depth 0.
    pub depth: usize,
}

impl<R: RowData> IndexedNode<R> {
    /// Returns whether this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Key-indexed arena over a row collection.
#[derive(Debug, Clone)]
pub struct TreeMate<R: RowData> {
    nodes: Vec<IndexedNode<R>>,
    roots: Vec<NodeId>,
    index: HashMap<R::Key, NodeId>,
}

impl<R: RowData> Default for TreeMate<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RowData> TreeMate<R> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Builds an index from a row collection, walking depth-first.
    ///
    /// Duplicate keys are handled permissively: the later row wins the
    /// key lookup slot and a warning is logged. Use [`Self::try_from_rows`]
    /// to reject duplicates instead.
    #[must_use]
    pub fn from_rows(rows: &[R]) -> Self {
        match Self::build(rows, false) {
            Ok(tree) => tree,
            // Unreachable: permissive builds never report duplicates.
            Err(_) => Self::new(),
        }
    }

    /// Builds an index from a row collection, failing on duplicate keys.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKeyError`] if two rows (anywhere in the nesting)
    /// resolve to the same key.
    pub fn try_from_rows(rows: &[R]) -> Result<Self, DuplicateKeyError> {
        Self::build(rows, true)
    }

    fn build(rows: &[R], strict: bool) -> Result<Self, DuplicateKeyError> {
        let mut tree = Self::new();
        for row in rows {
            let id = tree.insert(row, None, 0, strict)?;
            tree.roots.push(id);
        }
        Ok(tree)
    }

    fn insert(
        &mut self,
        row: &R,
        parent: Option<NodeId>,
        depth: usize,
        strict: bool,
    ) -> Result<NodeId, DuplicateKeyError> {
        let key = row.key();
        let id = self.nodes.len();

        if self.index.contains_key(&key) {
            if strict {
                return Err(DuplicateKeyError {
                    key: format!("{key:?}"),
                });
            }
            tracing::warn!(key = ?key, "duplicate row key, last write wins");
        }
        self.index.insert(key.clone(), id);

        self.nodes.push(IndexedNode {
            id,
            key,
            row: row.clone(),
            parent,
            children: Vec::new(),
            depth,
        });

        for child in row.children() {
            let child_id = self.insert(child, Some(id), depth + 1, strict)?;
            self.nodes[id].children.push(child_id);
        }

        Ok(id)
    }

    /// Returns the node for a key, if present.
    #[must_use]
    pub fn get(&self, key: &R::Key) -> Option<&IndexedNode<R>> {
        self.index.get(key).map(|&id| &self.nodes[id])
    }

    /// Returns whether a key is registered.
    #[must_use]
    pub fn contains(&self, key: &R::Key) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the node with the given arena id.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &IndexedNode<R> {
        &self.nodes[id]
    }

    /// Returns the arena ids of the top-level rows, in input order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns the total number of indexed nodes (children included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the index holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns whether any indexed row has children (tree mode).
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.nodes.iter().any(|n| !n.children.is_empty())
    }

    /// Iterates over all nodes in depth-first insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexedNode<R>> {
        self.nodes.iter()
    }

    /// Iterates over every registered key.
    pub fn keys(&self) -> impl Iterator<Item = &R::Key> {
        self.index.keys()
    }

    /// Returns the keys of all leaf descendants of `key`, depth-first.
    ///
    /// If the node itself is a leaf the result is just its own key; for an
    /// unknown key the result is empty.
    #[must_use]
    pub fn descendant_leaf_keys(&self, key: &R::Key) -> Vec<R::Key> {
        let Some(node) = self.get(key) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        self.collect_leaves(node.id, &mut out);
        out
    }

    fn collect_leaves(&self, id: NodeId, out: &mut Vec<R::Key>) {
        let node = &self.nodes[id];
        if node.children.is_empty() {
            out.push(node.key.clone());
        } else {
            for &child in &node.children {
                self.collect_leaves(child, out);
            }
        }
    }

    /// Returns the keys of all descendants of `key` (leaves and interior
    /// nodes, the node itself excluded), depth-first.
    #[must_use]
    pub fn descendant_keys(&self, key: &R::Key) -> Vec<R::Key> {
        let Some(node) = self.get(key) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for &child in &node.children {
            self.collect_subtree(child, &mut out);
        }
        out
    }

    fn collect_subtree(&self, id: NodeId, out: &mut Vec<R::Key>) {
        let node = &self.nodes[id];
        out.push(node.key.clone());
        for &child in &node.children {
            self.collect_subtree(child, out);
        }
    }

    /// Returns the ancestor keys of `key`, nearest parent first.
    ///
    /// Empty for top-level rows and for unknown keys.
    #[must_use]
    pub fn ancestor_keys(&self, key: &R::Key) -> Vec<R::Key> {
        let Some(node) = self.get(key) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut current = node.parent;
        while let Some(id) = current {
            let parent = &self.nodes[id];
            out.push(parent.key.clone());
            current = parent.parent;
        }
        out
    }
}
