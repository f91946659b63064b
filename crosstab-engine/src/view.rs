//! FILENAME: crosstab-engine/src/view.rs
//! Cross-tab View - Renderable output for the frontend.
//!
//! The view is a query-scoped snapshot: header sequences for both axes and
//! one row mapping per row header, keyed by column `path_id`. It is
//! discarded by the caller once rendered; mutations never patch it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::format::format_number;
use crate::header::{AxisHeaders, HeaderNode, HeaderRole, ROW_SUM_SENTINEL};

// ============================================================================
// CELLS
// ============================================================================

/// A single grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    /// Surfaces a header in the row-label column (or the corner).
    Header { header: HeaderNode },
    /// An aggregated sum: `label` for display, `value` for sorting.
    Value { label: String, value: f64 },
}

impl Cell {
    pub fn header(header: HeaderNode) -> Self {
        Cell::Header { header }
    }

    pub fn value(value: f64) -> Self {
        Cell::Value {
            label: format_number(value),
            value,
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, Cell::Header { .. })
    }

    pub fn header_data(&self) -> Option<&HeaderNode> {
        match self {
            Cell::Header { header } => Some(header),
            Cell::Value { .. } => None,
        }
    }

    pub fn number_value(&self) -> Option<f64> {
        match self {
            Cell::Value { value, .. } => Some(*value),
            Cell::Header { .. } => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Cell::Header { header } => &header.label,
            Cell::Value { label, .. } => label,
        }
    }
}

// ============================================================================
// ROWS AND TABLE
// ============================================================================

/// One grid row: column `path_id` -> cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRecord {
    /// Index of this row's header in `TableData::row_headers`.
    pub header: usize,

    pub cells: FxHashMap<String, Cell>,
}

impl RowRecord {
    pub fn get(&self, column_path_id: &str) -> Option<&Cell> {
        self.cells.get(column_path_id)
    }
}

/// The complete output of one table query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// Column headers in display order, including the row-label column
    /// first and the grand-total column last when the table is not empty.
    pub column_headers: AxisHeaders,

    /// Row headers in display order, ending with the grand-total row.
    pub row_headers: AxisHeaders,

    pub rows: Vec<RowRecord>,

    /// False while any row header is expanded: sorting would tear children
    /// away from their parents.
    pub can_sort_columns: bool,
}

impl TableData {
    /// The table produced when no dimension is chosen on either axis.
    pub fn empty() -> Self {
        TableData {
            column_headers: AxisHeaders::new(),
            row_headers: AxisHeaders::new(),
            rows: Vec::new(),
            can_sort_columns: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.column_headers.is_empty() && self.rows.is_empty()
    }

    /// Column keys in display order (what a table widget tracks columns by).
    pub fn column_names(&self) -> Vec<&str> {
        self.column_headers.path_ids().collect()
    }

    pub fn row_header(&self, row: &RowRecord) -> Option<&HeaderNode> {
        self.row_headers.get(row.header)
    }

    /// Display-order position of the grand-total row, if present.
    pub fn total_row_position(&self) -> Option<usize> {
        self.rows.iter().position(|row| {
            self.row_header(row)
                .is_some_and(|header| header.role == HeaderRole::ColumnSum)
        })
    }

    /// The corner value where the grand-total row meets the grand-total column.
    pub fn grand_total(&self) -> Option<f64> {
        let row = &self.rows[self.total_row_position()?];
        row.get(ROW_SUM_SENTINEL)?.number_value()
    }
}

/// Records behind one aggregated cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillDownResult {
    pub row_path_id: String,

    pub column_path_id: String,

    /// Indices into the record collection, in record order.
    pub record_indices: Vec<usize>,

    /// Sum of the measure over those records (equals the cell value).
    pub total: f64,
}
