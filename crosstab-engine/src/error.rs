//! FILENAME: crosstab-engine/src/error.rs

use thiserror::Error;

use crate::registry::DimensionList;

#[derive(Error, Debug)]
pub enum CrossTabError {
    /// A header-display cell was used as a numeric sort key. Header cells only
    /// live in the row-label column, so reaching this means the grid invariant
    /// was bypassed somewhere upstream.
    #[error("header cells can not be sorted (column `{column}`)")]
    InvalidSortTarget { column: String },

    #[error("column sorting is disabled while row headers are expanded")]
    SortDisabled,

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("unknown row: {0}")]
    UnknownRow(usize),

    #[error("cell at column `{column}` is a header cell, not an aggregated value")]
    NotAValueCell { column: String },

    #[error("unsupported mutation `{operation}`: {reason}")]
    UnsupportedMutation {
        operation: &'static str,
        reason: String,
    },

    #[error("index {index} out of range for {list:?} dimensions (len {len})")]
    DimensionIndexOutOfRange {
        list: DimensionList,
        index: usize,
        len: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("cross-tab state lock poisoned")]
    StatePoisoned,
}

pub type Result<T> = std::result::Result<T, CrossTabError>;
