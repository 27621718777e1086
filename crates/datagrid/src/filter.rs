//! Filter engine.
//!
//! Applies per-column predicates to a [`TreeMate`] index and produces a
//! pruned [`ViewNode`] tree. Semantics: logical AND across columns, logical
//! OR across the selected values of one column, and in tree mode a parent
//! is retained whenever any of its descendants matches.
//!
//! Filtering is synchronous and re-runs in full on every state change.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use treemate::{NodeId, RowData, TreeMate};

use crate::column::{Column, DataColumn, FilterValue, leaf_data_columns};

/// One node of the filtered (or unfiltered) view, preserving tree shape.
///
/// Carries arena ids into the [`TreeMate`] that produced it; like node ids,
/// a view is stale once the index is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewNode {
    /// Arena id of the underlying indexed node.
    pub id: NodeId,
    /// Retained children, in row order.
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    /// Number of nodes in this subtree, the node itself included.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ViewNode::subtree_len)
            .sum::<usize>()
    }
}

/// Active filter values per column key.
///
/// An absent entry (or an entry with no values) means the column is
/// inactive and applies no filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    active: HashMap<String, Vec<FilterValue>>,
}

impl FilterState {
    /// Creates an empty filter state (nothing filtered).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the active values for a column. An empty vector deactivates it.
    pub fn set(&mut self, column: impl Into<String>, values: Vec<FilterValue>) {
        let column = column.into();
        if values.is_empty() {
            self.active.remove(&column);
        } else {
            self.active.insert(column, values);
        }
    }

    /// Deactivates a column's filter.
    pub fn clear(&mut self, column: &str) {
        self.active.remove(column);
    }

    /// Deactivates every filter.
    pub fn clear_all(&mut self) {
        self.active.clear();
    }

    /// Returns the active values for a column.
    #[must_use]
    pub fn get(&self, column: &str) -> &[FilterValue] {
        self.active.get(column).map_or(&[], Vec::as_slice)
    }

    /// Returns whether a column has an active filter.
    #[must_use]
    pub fn is_active(&self, column: &str) -> bool {
        !self.get(column).is_empty()
    }

    /// Returns whether no filter is active at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Iterates over `(column key, active values)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FilterValue])> {
        self.active
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Builds the unfiltered view over the whole index.
#[must_use]
pub fn full_view<R: RowData>(tree: &TreeMate<R>) -> Vec<ViewNode> {
    tree.roots()
        .iter()
        .map(|&id| clone_subtree(tree, id))
        .collect()
}

fn clone_subtree<R: RowData>(tree: &TreeMate<R>, id: NodeId) -> ViewNode {
    ViewNode {
        id,
        children: tree
            .node(id)
            .children
            .iter()
            .map(|&child| clone_subtree(tree, child))
            .collect(),
    }
}

/// Applies the filter state and returns the retained view.
///
/// Active filters referencing a column without a predicate are ignored with
/// a logged warning (a malformed filter must not take the table down).
/// Predicate panics are not caught.
#[must_use]
pub fn apply<R: RowData>(
    tree: &TreeMate<R>,
    columns: &[Column<R>],
    state: &FilterState,
) -> Vec<ViewNode> {
    if state.is_empty() {
        return full_view(tree);
    }

    let data_columns = leaf_data_columns(columns);
    let mut active: Vec<(&DataColumn<R>, &[FilterValue])> = Vec::new();
    for (key, values) in state.iter() {
        match data_columns.iter().find(|col| col.key == key) {
            Some(col) if col.is_filterable() => active.push((col, values)),
            Some(_) => {
                tracing::warn!(column = key, "filter set on column without a predicate, ignored");
            }
            None => {
                tracing::warn!(column = key, "filter set on unknown column, ignored");
            }
        }
    }
    if active.is_empty() {
        return full_view(tree);
    }

    tree.roots()
        .iter()
        .filter_map(|&id| retain(tree, id, &active))
        .collect()
}

fn retain<R: RowData>(
    tree: &TreeMate<R>,
    id: NodeId,
    active: &[(&DataColumn<R>, &[FilterValue])],
) -> Option<ViewNode> {
    let node = tree.node(id);
    let children: Vec<ViewNode> = node
        .children
        .iter()
        .filter_map(|&child| retain(tree, child, active))
        .collect();

    // Parent visibility follows child matches in tree mode.
    if !children.is_empty() || matches_all(&node.row, active) {
        Some(ViewNode { id, children })
    } else {
        None
    }
}

fn matches_all<R>(row: &R, active: &[(&DataColumn<R>, &[FilterValue])]) -> bool {
    active.iter().all(|(col, values)| {
        let Some(predicate) = col.filter.as_ref() else {
            return true;
        };
        values.iter().any(|value| predicate(row, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::DataColumn;
    use treemate::RowData;

    #[derive(Clone, Debug)]
    struct Rec {
        id: u32,
        age: i64,
        children: Vec<Rec>,
    }

    impl Rec {
        fn new(id: u32, age: i64) -> Self {
            Self {
                id,
                age,
                children: vec![],
            }
        }

        fn with_children(mut self, children: Vec<Rec>) -> Self {
            self.children = children;
            self
        }
    }

    impl RowData for Rec {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }

        fn children(&self) -> &[Self] {
            &self.children
        }
    }

    fn age_columns() -> Vec<Column<Rec>> {
        vec![
            DataColumn::new("age", "Age")
                .filter(|r: &Rec, v| matches!(v, FilterValue::Int(min) if r.age > *min))
                .into(),
        ]
    }

    #[test]
    fn test_inactive_state_returns_full_view() {
        let rows = vec![Rec::new(1, 20), Rec::new(2, 30)];
        let tree = TreeMate::from_rows(&rows);
        let view = apply(&tree, &age_columns(), &FilterState::new());
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_flat_filtering() {
        let rows = vec![Rec::new(1, 20), Rec::new(2, 30), Rec::new(3, 40)];
        let tree = TreeMate::from_rows(&rows);

        let mut state = FilterState::new();
        state.set("age", vec![FilterValue::Int(25)]);

        let view = apply(&tree, &age_columns(), &state);
        let keys: Vec<u32> = view.iter().map(|n| tree.node(n.id).key).collect();
        assert_eq!(keys, vec![2, 3]);
    }

    #[test]
    fn test_or_within_column() {
        let columns: Vec<Column<Rec>> = vec![
            DataColumn::new("age", "Age")
                .filter(|r: &Rec, v| matches!(v, FilterValue::Int(exact) if r.age == *exact))
                .into(),
        ];
        let rows = vec![Rec::new(1, 20), Rec::new(2, 30), Rec::new(3, 40)];
        let tree = TreeMate::from_rows(&rows);

        let mut state = FilterState::new();
        state.set("age", vec![FilterValue::Int(20), FilterValue::Int(40)]);

        let view = apply(&tree, &columns, &state);
        let keys: Vec<u32> = view.iter().map(|n| tree.node(n.id).key).collect();
        assert_eq!(keys, vec![1, 3]);
    }

    #[test]
    fn test_and_across_columns() {
        let columns: Vec<Column<Rec>> = vec![
            DataColumn::new("min", "Min")
                .filter(|r: &Rec, v| matches!(v, FilterValue::Int(min) if r.age > *min))
                .into(),
            DataColumn::new("max", "Max")
                .filter(|r: &Rec, v| matches!(v, FilterValue::Int(max) if r.age < *max))
                .into(),
        ];
        let rows = vec![Rec::new(1, 20), Rec::new(2, 30), Rec::new(3, 40)];
        let tree = TreeMate::from_rows(&rows);

        let mut state = FilterState::new();
        state.set("min", vec![FilterValue::Int(25)]);
        state.set("max", vec![FilterValue::Int(35)]);

        let view = apply(&tree, &columns, &state);
        let keys: Vec<u32> = view.iter().map(|n| tree.node(n.id).key).collect();
        assert_eq!(keys, vec![2]);
    }

    #[test]
    fn test_parent_retained_when_descendant_matches() {
        let rows = vec![
            Rec::new(1, 10).with_children(vec![Rec::new(2, 50), Rec::new(3, 10)]),
            Rec::new(4, 10),
        ];
        let tree = TreeMate::from_rows(&rows);

        let mut state = FilterState::new();
        state.set("age", vec![FilterValue::Int(25)]);

        let view = apply(&tree, &age_columns(), &state);
        assert_eq!(view.len(), 1);
        assert_eq!(tree.node(view[0].id).key, 1);
        // Only the matching child survives under the retained parent.
        assert_eq!(view[0].children.len(), 1);
        assert_eq!(tree.node(view[0].children[0].id).key, 2);
    }

    #[test]
    fn test_filter_on_unknown_or_unfilterable_column_is_ignored() {
        let rows = vec![Rec::new(1, 20), Rec::new(2, 30)];
        let tree = TreeMate::from_rows(&rows);

        let mut state = FilterState::new();
        state.set("nope", vec![FilterValue::Int(25)]);

        let view = apply(&tree, &age_columns(), &state);
        assert_eq!(view.len(), 2);

        let plain: Vec<Column<Rec>> = vec![DataColumn::new("age", "Age").into()];
        let view = apply(&tree, &plain, &state);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_set_empty_values_deactivates() {
        let mut state = FilterState::new();
        state.set("age", vec![FilterValue::Int(25)]);
        assert!(state.is_active("age"));

        state.set("age", vec![]);
        assert!(!state.is_active("age"));
        assert!(state.is_empty());
    }

    #[test]
    fn test_subtree_len() {
        let rows = vec![Rec::new(1, 0).with_children(vec![Rec::new(2, 0), Rec::new(3, 0)])];
        let tree = TreeMate::from_rows(&rows);
        let view = full_view(&tree);
        assert_eq!(view[0].subtree_len(), 3);
    }
}
