//! Column descriptors for the table core.
//!
//! Columns come in four variants, modeled as a tagged union so engine code
//! can match exhaustively instead of probing optional fields: data columns
//! (the ones filtering/sorting/export care about), a selection-checkbox
//! column, an expand-trigger column, and a group column spanning
//! sub-columns.
//!
//! # Example
//!
//! ```rust
//! use datagrid::column::{Column, DataColumn, FilterValue};
//!
//! #[derive(Clone)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! let columns: Vec<Column<Person>> = vec![
//!     Column::Selection,
//!     DataColumn::new("name", "Name")
//!         .sorter(|a: &Person, b: &Person| a.name.cmp(&b.name))
//!         .into(),
//!     DataColumn::new("age", "Age")
//!         .filter(|p: &Person, v: &FilterValue| match v {
//!             FilterValue::Int(min) => i64::from(p.age) > *min,
//!             _ => false,
//!         })
//!         .into(),
//! ];
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Filter predicate for a data column.
///
/// Called once per (row, selected value) pair. The engine does not catch
/// panics raised here; a panicking predicate is a caller bug and propagates.
pub type FilterFn<R> = Arc<dyn Fn(&R, &FilterValue) -> bool + Send + Sync>;

/// Sort comparator for a data column.
///
/// Must implement a total order over rows. Panics are not caught.
pub type SortFn<R> = Arc<dyn Fn(&R, &R) -> Ordering + Send + Sync>;

/// An active filter value for one column.
///
/// Opaque to the engines: values are only ever handed to the owning
/// column's [`FilterFn`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    /// Text value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// A selectable filter option presented by a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Human-readable label.
    pub label: String,
    /// Value passed to the column's [`FilterFn`] when selected.
    pub value: FilterValue,
}

impl FilterOption {
    /// Creates a new filter option.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Which table edge a column is pinned to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FixedSide {
    /// Not pinned.
    #[default]
    None,
    /// Pinned to the left edge.
    Left,
    /// Pinned to the right edge.
    Right,
}

/// A data-bearing column.
#[derive(Clone)]
pub struct DataColumn<R> {
    /// Unique column key, referenced by filter and sort state.
    pub key: String,
    /// Column title displayed in the header.
    pub title: String,
    /// Filter predicate. Columns without one cannot be filtered.
    pub filter: Option<FilterFn<R>>,
    /// Filter options offered to the user (empty for custom filters).
    pub filter_options: Vec<FilterOption>,
    /// Whether multiple filter options may be active at once. When false,
    /// [`crate::table::TableData::set_filter`] keeps only the last value.
    pub filter_multiple: bool,
    /// Sort comparator. Columns without one cannot be sorted.
    pub sorter: Option<SortFn<R>>,
    /// Pinned edge.
    pub fixed: FixedSide,
    /// Width override in pixels, if resized.
    pub width: Option<u32>,
}

impl<R> DataColumn<R> {
    /// Creates a data column with the given key and title.
    #[must_use]
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            filter: None,
            filter_options: Vec::new(),
            filter_multiple: true,
            sorter: None,
            fixed: FixedSide::None,
            width: None,
        }
    }

    /// Sets the filter predicate (builder pattern).
    #[must_use]
    pub fn filter(mut self, f: impl Fn(&R, &FilterValue) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Arc::new(f));
        self
    }

    /// Sets the filter options (builder pattern).
    #[must_use]
    pub fn filter_options(mut self, options: Vec<FilterOption>) -> Self {
        self.filter_options = options;
        self
    }

    /// Restricts the filter to a single active option (builder pattern).
    #[must_use]
    pub fn single_select(mut self) -> Self {
        self.filter_multiple = false;
        self
    }

    /// Sets the sort comparator (builder pattern).
    #[must_use]
    pub fn sorter(mut self, f: impl Fn(&R, &R) -> Ordering + Send + Sync + 'static) -> Self {
        self.sorter = Some(Arc::new(f));
        self
    }

    /// Pins the column to one edge (builder pattern).
    #[must_use]
    pub fn fixed(mut self, side: FixedSide) -> Self {
        self.fixed = side;
        self
    }

    /// Sets a width override (builder pattern).
    #[must_use]
    pub fn width(mut self, w: u32) -> Self {
        self.width = Some(w);
        self
    }

    /// Returns whether the column can participate in sorting.
    #[must_use]
    pub fn is_sortable(&self) -> bool {
        self.sorter.is_some()
    }

    /// Returns whether the column can participate in filtering.
    #[must_use]
    pub fn is_filterable(&self) -> bool {
        self.filter.is_some()
    }
}

impl<R> fmt::Debug for DataColumn<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataColumn")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("filterable", &self.is_filterable())
            .field("sortable", &self.is_sortable())
            .field("fixed", &self.fixed)
            .field("width", &self.width)
            .finish()
    }
}

/// A table column.
#[derive(Debug, Clone)]
pub enum Column<R> {
    /// A data-bearing column.
    Data(DataColumn<R>),
    /// The selection-checkbox column.
    Selection,
    /// The expand/collapse trigger column for tree rows.
    Expander,
    /// A header group spanning sub-columns.
    Group {
        /// Group title displayed across the spanned header cells.
        title: String,
        /// Spanned columns.
        children: Vec<Column<R>>,
    },
}

impl<R> From<DataColumn<R>> for Column<R> {
    fn from(col: DataColumn<R>) -> Self {
        Self::Data(col)
    }
}

impl<R> Column<R> {
    /// Returns the data column, if this is one.
    #[must_use]
    pub fn as_data(&self) -> Option<&DataColumn<R>> {
        match self {
            Self::Data(col) => Some(col),
            _ => None,
        }
    }
}

/// Flattens group columns and returns every data column, in display order.
#[must_use]
pub fn leaf_data_columns<R>(columns: &[Column<R>]) -> Vec<&DataColumn<R>> {
    let mut out = Vec::new();
    collect_data_columns(columns, &mut out);
    out
}

fn collect_data_columns<'a, R>(columns: &'a [Column<R>], out: &mut Vec<&'a DataColumn<R>>) {
    for column in columns {
        match column {
            Column::Data(col) => out.push(col),
            Column::Group { children, .. } => collect_data_columns(children, out),
            Column::Selection | Column::Expander => {}
        }
    }
}

/// Finds a data column by key, searching through groups.
#[must_use]
pub fn find_data_column<'a, R>(columns: &'a [Column<R>], key: &str) -> Option<&'a DataColumn<R>> {
    leaf_data_columns(columns)
        .into_iter()
        .find(|col| col.key == key)
}
