//! CSV export.
//!
//! Serializes the filtered (optionally current-page-only) rows to a CSV
//! string using caller-supplied per-header and per-cell stringifiers: one
//! header row, then one row per data row, depth-first through tree rows.
//! Quoting follows RFC 4180 via the `csv` crate, so cell values containing
//! commas, quotes, or newlines round-trip safely.

use thiserror::Error;
use treemate::RowData;

use crate::column::{DataColumn, leaf_data_columns};
use crate::filter::ViewNode;
use crate::table::TableData;

/// CSV export failure.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The CSV writer rejected a record.
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    /// The writer's buffer could not be recovered.
    #[error("csv buffer error: {0}")]
    Io(#[from] std::io::Error),
    /// A stringifier produced invalid UTF-8 output buffering.
    #[error("csv output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Export options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Whether to emit the header row. Default: `true`.
    pub include_header: bool,
    /// Export only the current page instead of the whole filtered view.
    /// Default: `false`.
    pub current_page_only: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            include_header: true,
            current_page_only: false,
        }
    }
}

/// Serializes the table's filtered rows to a CSV string.
///
/// `header` renders one header cell per data column; `cell` renders one
/// body cell for a (row, column) pair. Selection/expander/group columns
/// have no cells of their own: groups contribute their nested data columns
/// and the rest are skipped.
///
/// # Errors
///
/// Returns [`ExportError`] if the underlying CSV writer fails.
pub fn csv_string<R, H, C>(
    table: &TableData<R>,
    header: H,
    cell: C,
    options: CsvOptions,
) -> Result<String, ExportError>
where
    R: RowData,
    H: Fn(&DataColumn<R>) -> String,
    C: Fn(&R, &DataColumn<R>) -> String,
{
    let columns = leaf_data_columns(table.columns());
    let mut writer = csv::Writer::from_writer(Vec::new());

    if options.include_header {
        writer.write_record(columns.iter().map(|col| header(col)))?;
    }

    let nodes: &[ViewNode] = if options.current_page_only {
        table.page_nodes()
    } else {
        table.view()
    };
    for node in nodes {
        write_subtree(table, node, &columns, &cell, &mut writer)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn write_subtree<R, C>(
    table: &TableData<R>,
    node: &ViewNode,
    columns: &[&DataColumn<R>],
    cell: &C,
    writer: &mut csv::Writer<Vec<u8>>,
) -> Result<(), csv::Error>
where
    R: RowData,
    C: Fn(&R, &DataColumn<R>) -> String,
{
    let row = &table.tree().node(node.id).row;
    writer.write_record(columns.iter().map(|col| cell(row, col)))?;
    for child in &node.children {
        write_subtree(table, child, columns, cell, writer)?;
    }
    Ok(())
}
