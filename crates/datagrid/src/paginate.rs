//! Pagination engine.
//!
//! Derives the visible page slice and page metadata from an item count and
//! a [`PageState`]. Pages are 1-indexed. The page count never drops below 1
//! (an empty table still has one, empty, page), and an out-of-range current
//! page clamps instead of erroring.

use serde::{Deserialize, Serialize};

/// What happens to the current page when filtering shrinks the page count
/// below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageFilterPolicy {
    /// Jump back to the first page.
    #[default]
    ResetToFirst,
    /// Stay as close as possible: clamp to the new last page.
    ClampToLast,
}

/// Current page and page size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    page: usize,
    page_size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

impl PageState {
    /// Creates a page state on page 1 with the given page size (minimum 1).
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Returns the current page (1-indexed).
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Sets the current page (minimum 1). Upper-bound clamping happens
    /// against the item count when the view is derived.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Sets the page size (minimum 1).
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }
}

/// Derived page metadata and slice bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView {
    /// Current page after clamping (1-indexed).
    pub current_page: usize,
    /// Total number of pages, at least 1.
    pub page_count: usize,
    /// Total number of items across all pages.
    pub item_count: usize,
    /// Start index of the page slice (inclusive).
    pub start: usize,
    /// End index of the page slice (exclusive).
    pub end: usize,
}

/// Computes page metadata and slice bounds for `item_count` items.
#[must_use]
pub fn page_view(item_count: usize, state: &PageState) -> PageView {
    let page_size = state.page_size();
    let page_count = item_count.div_ceil(page_size).max(1);
    let current_page = state.page().min(page_count);

    // current_page <= page_count keeps start within bounds, including the
    // degenerate empty table (one empty page, start == end == 0).
    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(item_count);

    PageView {
        current_page,
        page_count,
        item_count,
        start,
        end,
    }
}

/// Slices `items` to the current page and returns the slice plus metadata.
#[must_use]
pub fn slice<'a, T>(items: &'a [T], state: &PageState) -> (&'a [T], PageView) {
    let view = page_view(items.len(), state);
    (&items[view.start..view.end], view)
}

/// Applies the filter-shrink policy after the page count changed.
///
/// Returns the page the state should move to; [`page_view`] clamping makes
/// this safe to skip, but callers that expose the current page to the user
/// want the state itself to be in range.
#[must_use]
pub fn apply_filter_policy(state: &PageState, new_page_count: usize, policy: PageFilterPolicy) -> usize {
    if state.page() <= new_page_count {
        return state.page();
    }
    match policy {
        PageFilterPolicy::ResetToFirst => 1,
        PageFilterPolicy::ClampToLast => new_page_count.max(1),
    }
}
