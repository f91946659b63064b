//! FILENAME: crosstab-engine/src/lib.rs
//! Cross-tabulation subsystem.
//!
//! Turns a flat collection of attributed records into a hierarchical
//! cross-tab: one header hierarchy per axis, a dense grid of summed cells,
//! grand totals on both axes, and per-node drill-down (expand/collapse).
//!
//! Layers:
//! - `definition`: Serializable configuration (records, dimensions, measure)
//! - `registry`: Which dimensions are available / chosen for rows / columns
//! - `expansion`: Path-keyed expand/collapse state per axis
//! - `header`: Header nodes and their path identity
//! - `engine`: Header tree builder, table assembler and cell aggregator
//! - `view`: Renderable output for the frontend (WHAT we display)
//! - `sort`: Sorting contract for the external table widget
//! - `session`: Mutex-guarded mutation-then-rebuild cycles

#[macro_use]
mod logging;

pub mod definition;
pub mod engine;
pub mod error;
pub mod expansion;
pub mod format;
pub mod header;
pub mod registry;
pub mod session;
pub mod sort;
pub mod view;

pub use definition::*;
pub use engine::{compute_cell, CrossTab};
pub use error::{CrossTabError, Result};
pub use expansion::{ExpansionSet, ExpansionState};
pub use format::{format_number, format_value};
pub use header::{
    AxisHeaders, HeaderNode, HeaderRole, COLUMN_SUM_SENTINEL, ROW_LABELS_SENTINEL,
    ROW_SUM_SENTINEL,
};
pub use registry::{DimensionList, DimensionRegistry};
pub use session::CrossTabSession;
pub use sort::{sort_rows, sorting_value, SortDirection};
pub use view::{Cell, DrillDownResult, RowRecord, TableData};
