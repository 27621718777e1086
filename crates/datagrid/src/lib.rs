#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Datagrid
//!
//! A headless data-table core: all the row derivation logic of a table
//! component with none of the rendering. Raw rows flow through a single
//! pipeline — indexed ([`treemate`]) → filtered → sorted → paginated —
//! while selection and expansion live alongside as side-state keyed by row
//! identity.
//!
//! Components:
//! - **column** - Column descriptors (data/selection/expander/group)
//! - **filter** - Per-column predicate filtering with tree pruning
//! - **sort** - Stable single- and multi-column sorting
//! - **paginate** - Page slicing and page metadata
//! - **check** - Checked/indeterminate selection with tree cascade
//! - **expand** - Expanded-row tracking
//! - **table** - The pipeline owner, [`table::TableData`]
//! - **export** - CSV serialization of the filtered rows
//!
//! Everything is synchronous and single-threaded: each operation runs to
//! completion on the calling thread, and derived state is recomputed in
//! dependency order on every mutation.
//!
//! ## Example
//!
//! ```rust
//! use datagrid::prelude::*;
//! use treemate::RowData;
//!
//! #[derive(Clone)]
//! struct Person {
//!     id: u32,
//!     age: i64,
//! }
//!
//! impl RowData for Person {
//!     type Key = u32;
//!
//!     fn key(&self) -> u32 {
//!         self.id
//!     }
//! }
//!
//! let columns = vec![
//!     DataColumn::new("age", "Age")
//!         .filter(|p: &Person, v: &FilterValue| {
//!             matches!(v, FilterValue::Int(min) if p.age > *min)
//!         })
//!         .sorter(|a: &Person, b: &Person| a.age.cmp(&b.age))
//!         .into(),
//! ];
//!
//! let mut table = TableData::new(columns);
//! table.set_rows(&[
//!     Person { id: 1, age: 20 },
//!     Person { id: 2, age: 30 },
//!     Person { id: 3, age: 40 },
//! ]);
//!
//! table.set_filter("age", vec![FilterValue::Int(25)]);
//! table.sort_by("age", SortOrder::Descend);
//! assert_eq!(table.item_count(), 2);
//! ```

pub mod check;
pub mod column;
pub mod expand;
pub mod export;
pub mod filter;
pub mod paginate;
pub mod sort;
pub mod table;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::check::{CheckAllScope, CheckController, CheckStatus};
    pub use crate::column::{
        Column, DataColumn, FilterOption, FilterValue, FixedSide, find_data_column,
        leaf_data_columns,
    };
    pub use crate::expand::ExpandController;
    pub use crate::export::{CsvOptions, ExportError, csv_string};
    pub use crate::filter::{FilterState, ViewNode};
    pub use crate::paginate::{PageFilterPolicy, PageState, PageView};
    pub use crate::sort::{SortEntry, SortOrder, SortState};
    pub use crate::table::{TableConfig, TableData, TableHooks};
}
