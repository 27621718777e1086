//! Table data pipeline.
//!
//! [`TableData`] owns the rows, the column descriptors, and all derived
//! state, and keeps the derivation chain consistent: raw rows are indexed
//! by [`treemate`], the index is filtered, the filtered view is sorted, and
//! the sorted view is paginated. Every state mutation re-runs the affected
//! downstream stages synchronously — the computations are cheap relative
//! to render cost, so there is no incremental recomputation, just a pure
//! pipeline invoked in dependency order.
//!
//! Selection and expansion are side-state keyed by row identity; they
//! consult the index for parent/child relationships but survive filter,
//! sort, and page changes untouched.
//!
//! Change hooks fire after the corresponding recomputation, carrying the
//! new state, so callers can persist state, reflect it in a URL, or emit
//! their own change events.

use treemate::{IndexedNode, RowData, TreeMate};

use crate::check::{CheckAllScope, CheckController};
use crate::column::{Column, FilterValue, find_data_column};
use crate::expand::ExpandController;
use crate::filter::{self, FilterState, ViewNode};
use crate::paginate::{self, PageFilterPolicy, PageState, PageView};
use crate::sort::{self, SortOrder, SortState};

/// Behavior knobs, fixed at table construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Current-page policy when a filter shrinks the page count below the
    /// current page. Default: [`PageFilterPolicy::ResetToFirst`].
    pub page_filter_policy: PageFilterPolicy,
    /// Scope of `check_all` / `uncheck_all`. Default:
    /// [`CheckAllScope::AllRows`].
    pub check_all_scope: CheckAllScope,
    /// Whether check/uncheck cascade through tree rows. Default: `true`.
    pub cascade: bool,
    /// Whether several columns may be sorted at once (priority order).
    /// Default: `false`.
    pub multi_sort: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_filter_policy: PageFilterPolicy::ResetToFirst,
            check_all_scope: CheckAllScope::AllRows,
            cascade: true,
            multi_sort: false,
        }
    }
}

/// Change callbacks, fired after the corresponding state recomputes.
///
/// All hooks are optional. They run synchronously on the mutating call.
pub struct TableHooks<K> {
    /// Fired when the filter state changes.
    pub on_filter_change: Option<Box<dyn FnMut(&FilterState)>>,
    /// Fired when the sort state changes.
    pub on_sort_change: Option<Box<dyn FnMut(&SortState)>>,
    /// Fired when the current page changes, with the new page.
    pub on_page_change: Option<Box<dyn FnMut(usize)>>,
    /// Fired when the page size changes, with the new size.
    pub on_page_size_change: Option<Box<dyn FnMut(usize)>>,
    /// Fired when the checked-key set changes, with the new checked keys.
    pub on_checked_change: Option<Box<dyn FnMut(&[K])>>,
    /// Fired when the expanded-key set changes, with the new expanded keys.
    pub on_expanded_change: Option<Box<dyn FnMut(&[K])>>,
}

impl<K> Default for TableHooks<K> {
    fn default() -> Self {
        Self {
            on_filter_change: None,
            on_sort_change: None,
            on_page_change: None,
            on_page_size_change: None,
            on_checked_change: None,
            on_expanded_change: None,
        }
    }
}

/// The table core: rows, columns, and every derived view.
pub struct TableData<R: RowData> {
    columns: Vec<Column<R>>,
    config: TableConfig,
    tree: TreeMate<R>,
    filter_state: FilterState,
    sort_state: SortState,
    page_state: PageState,
    check: CheckController<R::Key>,
    expand: ExpandController<R::Key>,
    hooks: TableHooks<R::Key>,
    /// Filtered and sorted top-level view, refreshed by `recompute`.
    view: Vec<ViewNode>,
}

impl<R: RowData> TableData<R> {
    /// Creates an empty table with default configuration.
    #[must_use]
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self::with_config(columns, TableConfig::default())
    }

    /// Creates an empty table with the given configuration.
    #[must_use]
    pub fn with_config(columns: Vec<Column<R>>, config: TableConfig) -> Self {
        Self {
            columns,
            config,
            tree: TreeMate::new(),
            filter_state: FilterState::new(),
            sort_state: if config.multi_sort {
                SortState::multiple()
            } else {
                SortState::new()
            },
            page_state: PageState::default(),
            check: CheckController::new(config.cascade),
            expand: ExpandController::new(),
            hooks: TableHooks::default(),
            view: Vec::new(),
        }
    }

    /// Replaces the row collection and rebuilds the index.
    ///
    /// Filter/sort/page state carries over and the pipeline re-runs.
    /// Checked and expanded keys are kept as-is; keys that no longer exist
    /// simply stop matching anything (stale keys are best-effort).
    pub fn set_rows(&mut self, rows: &[R]) {
        self.tree = TreeMate::from_rows(rows);
        self.recompute();
    }

    /// Returns the underlying index.
    #[must_use]
    pub fn tree(&self) -> &TreeMate<R> {
        &self.tree
    }

    /// Returns the column descriptors.
    #[must_use]
    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Looks up a row by key.
    #[must_use]
    pub fn row(&self, key: &R::Key) -> Option<&R> {
        self.tree.get(key).map(|node| &node.row)
    }

    // ------------------------------------------------------------------
    // Hooks
    // ------------------------------------------------------------------

    /// Sets the filter-changed hook.
    pub fn on_filter_change(&mut self, f: impl FnMut(&FilterState) + 'static) {
        self.hooks.on_filter_change = Some(Box::new(f));
    }

    /// Sets the sort-changed hook.
    pub fn on_sort_change(&mut self, f: impl FnMut(&SortState) + 'static) {
        self.hooks.on_sort_change = Some(Box::new(f));
    }

    /// Sets the page-changed hook.
    pub fn on_page_change(&mut self, f: impl FnMut(usize) + 'static) {
        self.hooks.on_page_change = Some(Box::new(f));
    }

    /// Sets the page-size-changed hook.
    pub fn on_page_size_change(&mut self, f: impl FnMut(usize) + 'static) {
        self.hooks.on_page_size_change = Some(Box::new(f));
    }

    /// Sets the checked-keys-changed hook.
    pub fn on_checked_change(&mut self, f: impl FnMut(&[R::Key]) + 'static) {
        self.hooks.on_checked_change = Some(Box::new(f));
    }

    /// Sets the expanded-keys-changed hook.
    pub fn on_expanded_change(&mut self, f: impl FnMut(&[R::Key]) + 'static) {
        self.hooks.on_expanded_change = Some(Box::new(f));
    }

    // ------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------

    /// Returns the filter state.
    #[must_use]
    pub fn filter_state(&self) -> &FilterState {
        &self.filter_state
    }

    /// Sets the active filter values for a column (empty values clear it)
    /// and re-runs filter, sort, and pagination.
    ///
    /// Single-select columns keep only the last of the given values; the
    /// filter state never holds more options than the column allows.
    pub fn set_filter(&mut self, column: impl Into<String>, mut values: Vec<FilterValue>) {
        let column = column.into();
        let single = find_data_column(&self.columns, &column)
            .is_some_and(|col| !col.filter_multiple);
        if single && values.len() > 1 {
            values = values.split_off(values.len() - 1);
        }
        self.filter_state.set(column, values);
        self.refilter();
    }

    /// Clears every active filter.
    pub fn clear_filters(&mut self) {
        self.filter_state.clear_all();
        self.refilter();
    }

    fn refilter(&mut self) {
        let old_page = self.page_state.page();
        self.recompute();

        let page_count = self.page_view().page_count;
        let new_page =
            paginate::apply_filter_policy(&self.page_state, page_count, self.config.page_filter_policy);
        self.page_state.set_page(new_page);

        self.emit_filter_changed();
        if new_page != old_page {
            self.emit_page_changed();
        }
    }

    // ------------------------------------------------------------------
    // Sorting
    // ------------------------------------------------------------------

    /// Returns the sort state.
    #[must_use]
    pub fn sort_state(&self) -> &SortState {
        &self.sort_state
    }

    /// Sorts by a column and re-runs the downstream pipeline.
    ///
    /// Requests against unknown or sorter-less columns are ignored with a
    /// logged warning.
    pub fn sort_by(&mut self, column: &str, order: SortOrder) {
        let sortable = find_data_column(&self.columns, column).is_some_and(|c| c.is_sortable());
        if !sortable {
            tracing::warn!(column, "sort requested on unsortable column, ignored");
            return;
        }
        self.sort_state.sort_by(column, order);
        self.recompute();
        self.emit_sort_changed();
    }

    /// Stops sorting by a column.
    pub fn unsort(&mut self, column: &str) {
        self.sort_state.remove(column);
        self.recompute();
        self.emit_sort_changed();
    }

    /// Clears the whole sort state.
    pub fn clear_sort(&mut self) {
        if self.sort_state.is_empty() {
            return;
        }
        self.sort_state.clear();
        self.recompute();
        self.emit_sort_changed();
    }

    // ------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------

    /// Returns the page state.
    #[must_use]
    pub fn page_state(&self) -> &PageState {
        &self.page_state
    }

    /// Returns page metadata for the current view.
    #[must_use]
    pub fn page_view(&self) -> PageView {
        paginate::page_view(self.view.len(), &self.page_state)
    }

    /// Moves to a page, clamped into `[1, page_count]`.
    pub fn set_page(&mut self, page: usize) {
        let page_count = self.page_view().page_count;
        let new_page = page.clamp(1, page_count);
        if new_page == self.page_state.page() {
            return;
        }
        self.page_state.set_page(new_page);
        self.emit_page_changed();
    }

    /// Changes the page size (minimum 1), keeping the page in range.
    pub fn set_page_size(&mut self, page_size: usize) {
        let old_page = self.page_state.page();
        self.page_state.set_page_size(page_size);
        let page_count = self.page_view().page_count;
        self.page_state.set_page(old_page.min(page_count));

        self.emit_page_size_changed();
        if self.page_state.page() != old_page {
            self.emit_page_changed();
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Returns the selection tracker.
    #[must_use]
    pub fn checks(&self) -> &CheckController<R::Key> {
        &self.check
    }

    /// Checks a row (cascading per configuration). Stale keys no-op.
    pub fn check(&mut self, key: &R::Key) {
        self.check.check(key, &self.tree);
        self.emit_checked_changed();
    }

    /// Unchecks a row (cascading per configuration). Stale keys no-op.
    pub fn uncheck(&mut self, key: &R::Key) {
        self.check.uncheck(key, &self.tree);
        self.emit_checked_changed();
    }

    /// Checks all rows in the configured scope.
    pub fn check_all(&mut self) {
        match self.config.check_all_scope {
            CheckAllScope::AllRows => self.check.check_all(&self.tree),
            CheckAllScope::CurrentPage => {
                let keys = self.page_top_level_keys();
                self.check.check_keys(keys.iter(), &self.tree);
            }
        }
        self.emit_checked_changed();
    }

    /// Unchecks all rows in the configured scope.
    pub fn uncheck_all(&mut self) {
        match self.config.check_all_scope {
            CheckAllScope::AllRows => self.check.uncheck_all(),
            CheckAllScope::CurrentPage => {
                let keys = self.page_top_level_keys();
                self.check.uncheck_keys(keys.iter(), &self.tree);
            }
        }
        self.emit_checked_changed();
    }

    /// Replaces the checked keys wholesale (controlled-state seeding).
    pub fn set_checked_keys(&mut self, keys: impl IntoIterator<Item = R::Key>) {
        self.check.replace(keys, &self.tree);
        self.emit_checked_changed();
    }

    // ------------------------------------------------------------------
    // Expansion
    // ------------------------------------------------------------------

    /// Returns the expansion tracker.
    #[must_use]
    pub fn expansion(&self) -> &ExpandController<R::Key> {
        &self.expand
    }

    /// Toggles a row's expansion; returns the new state.
    pub fn toggle_expand(&mut self, key: &R::Key) -> bool {
        let expanded = self.expand.toggle(key, &self.tree);
        self.emit_expanded_changed();
        expanded
    }

    /// Expands every row with children.
    pub fn expand_all(&mut self) {
        self.expand.expand_all(&self.tree);
        self.emit_expanded_changed();
    }

    /// Collapses every row.
    pub fn collapse_all(&mut self) {
        self.expand.collapse_all();
        self.emit_expanded_changed();
    }

    /// Replaces the expanded keys wholesale (controlled-state seeding).
    pub fn set_expanded_keys(&mut self, keys: impl IntoIterator<Item = R::Key>) {
        self.expand.replace(keys, &self.tree);
        self.emit_expanded_changed();
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Returns the filtered, sorted top-level view (all pages).
    #[must_use]
    pub fn view(&self) -> &[ViewNode] {
        &self.view
    }

    /// Number of top-level rows after filtering.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.view.len()
    }

    /// Returns the view nodes of the current page.
    #[must_use]
    pub fn page_nodes(&self) -> &[ViewNode] {
        let view = self.page_view();
        &self.view[view.start..view.end]
    }

    /// Returns the top-level rows of the current page, in display order.
    #[must_use]
    pub fn page_rows(&self) -> Vec<&R> {
        self.page_nodes()
            .iter()
            .map(|n| &self.tree.node(n.id).row)
            .collect()
    }

    /// Returns the rows of the current page flattened for display:
    /// top-level rows plus the children of expanded rows, depth-first.
    #[must_use]
    pub fn display_rows(&self) -> Vec<&IndexedNode<R>> {
        let mut out = Vec::new();
        for node in self.page_nodes() {
            self.flatten_visible(node, &mut out);
        }
        out
    }

    fn flatten_visible<'a>(&'a self, node: &ViewNode, out: &mut Vec<&'a IndexedNode<R>>) {
        let indexed = self.tree.node(node.id);
        out.push(indexed);
        if self.expand.is_expanded(&indexed.key) {
            for child in &node.children {
                self.flatten_visible(child, out);
            }
        }
    }

    fn page_top_level_keys(&self) -> Vec<R::Key> {
        self.page_nodes()
            .iter()
            .map(|n| self.tree.node(n.id).key.clone())
            .collect()
    }

    /// Re-runs filter and sort over the current index.
    fn recompute(&mut self) {
        let filtered = filter::apply(&self.tree, &self.columns, &self.filter_state);
        self.view = sort::apply(&self.tree, filtered, &self.columns, &self.sort_state);
        tracing::debug!(
            top_level = self.view.len(),
            indexed = self.tree.len(),
            "view recomputed"
        );
    }

    // ------------------------------------------------------------------
    // Hook dispatch
    // ------------------------------------------------------------------

    fn emit_filter_changed(&mut self) {
        if let Some(cb) = self.hooks.on_filter_change.as_mut() {
            cb(&self.filter_state);
        }
    }

    fn emit_sort_changed(&mut self) {
        if let Some(cb) = self.hooks.on_sort_change.as_mut() {
            cb(&self.sort_state);
        }
    }

    fn emit_page_changed(&mut self) {
        if let Some(cb) = self.hooks.on_page_change.as_mut() {
            cb(self.page_state.page());
        }
    }

    fn emit_page_size_changed(&mut self) {
        if let Some(cb) = self.hooks.on_page_size_change.as_mut() {
            cb(self.page_state.page_size());
        }
    }

    fn emit_checked_changed(&mut self) {
        if let Some(cb) = self.hooks.on_checked_change.as_mut() {
            let keys: Vec<R::Key> = self.check.checked_keys().cloned().collect();
            cb(&keys);
        }
    }

    fn emit_expanded_changed(&mut self) {
        if let Some(cb) = self.hooks.on_expanded_change.as_mut() {
            let keys: Vec<R::Key> = self.expand.expanded_keys().cloned().collect();
            cb(&keys);
        }
    }
}
