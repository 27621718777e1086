//! Sort engine.
//!
//! Orders a filtered view with a composite comparator built from the sort
//! state: entries are chained in priority order and the first non-equal
//! comparison wins. The sort is stable (`slice::sort_by`), so rows with
//! equal keys keep their input order, and it never mutates row data — it
//! only reorders the [`ViewNode`] tree.

use serde::{Deserialize, Serialize};
use treemate::{RowData, TreeMate};

use crate::column::{Column, SortFn, find_data_column};
use crate::filter::ViewNode;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Smallest first.
    Ascend,
    /// Largest first.
    Descend,
}

impl SortOrder {
    /// Returns the opposite direction.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascend => Self::Descend,
            Self::Descend => Self::Ascend,
        }
    }
}

/// One active sort criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortEntry {
    /// Key of the sorted column.
    pub column: String,
    /// Direction.
    pub order: SortOrder,
}

/// Ordered sort criteria.
///
/// At most one entry exists per column. In multi-column mode new columns
/// are appended (lowest priority); in single-column mode (the default) a
/// new column replaces whatever was sorted before.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortState {
    entries: Vec<SortEntry>,
    multiple: bool,
}

impl SortState {
    /// Creates an empty, single-column sort state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty, multi-column sort state.
    #[must_use]
    pub fn multiple() -> Self {
        Self {
            entries: Vec::new(),
            multiple: true,
        }
    }

    /// Returns whether multi-column sorting is enabled.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Activates or updates sorting on a column.
    ///
    /// An already-active column changes direction in place, keeping its
    /// priority slot.
    pub fn sort_by(&mut self, column: impl Into<String>, order: SortOrder) {
        let column = column.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.column == column) {
            entry.order = order;
            return;
        }
        if !self.multiple {
            self.entries.clear();
        }
        self.entries.push(SortEntry { column, order });
    }

    /// Removes a column from the sort criteria.
    pub fn remove(&mut self, column: &str) {
        self.entries.retain(|e| e.column != column);
    }

    /// Removes every criterion.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the active criteria in priority order (primary first).
    #[must_use]
    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    /// Returns the active direction for a column, if sorted.
    #[must_use]
    pub fn order_of(&self, column: &str) -> Option<SortOrder> {
        self.entries
            .iter()
            .find(|e| e.column == column)
            .map(|e| e.order)
    }

    /// Returns whether no criterion is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sorts a view per the sort state and returns the reordered view.
///
/// Each sibling group is sorted independently with the same comparator
/// chain, so tree structure is preserved. Criteria referencing unknown or
/// non-sortable columns are skipped with a logged warning. Comparator
/// panics are not caught.
#[must_use]
pub fn apply<R: RowData>(
    tree: &TreeMate<R>,
    mut view: Vec<ViewNode>,
    columns: &[Column<R>],
    state: &SortState,
) -> Vec<ViewNode> {
    let mut chain: Vec<(SortFn<R>, SortOrder)> = Vec::new();
    for entry in state.entries() {
        match find_data_column(columns, &entry.column) {
            Some(col) => match col.sorter.clone() {
                Some(sorter) => chain.push((sorter, entry.order)),
                None => {
                    tracing::warn!(column = %entry.column, "sort requested on column without a sorter, ignored");
                }
            },
            None => {
                tracing::warn!(column = %entry.column, "sort requested on unknown column, ignored");
            }
        }
    }
    if chain.is_empty() {
        return view;
    }

    sort_siblings(tree, &mut view, &chain);
    view
}

fn sort_siblings<R: RowData>(
    tree: &TreeMate<R>,
    nodes: &mut [ViewNode],
    chain: &[(SortFn<R>, SortOrder)],
) {
    nodes.sort_by(|a, b| {
        let ra = &tree.node(a.id).row;
        let rb = &tree.node(b.id).row;
        for (sorter, order) in chain {
            let ord = match order {
                SortOrder::Ascend => sorter(ra, rb),
                SortOrder::Descend => sorter(ra, rb).reverse(),
            };
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    });

    for node in nodes {
        sort_siblings(tree, &mut node.children, chain);
    }
}
