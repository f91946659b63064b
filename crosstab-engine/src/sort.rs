//! FILENAME: crosstab-engine/src/sort.rs
//! Sorting contract for the external table widget.
//!
//! The widget sorts rows by the numeric value behind a column's cells.
//! Header cells have no numeric value, and asking for one is a contract
//! violation that fails loudly.

use serde::{Deserialize, Serialize};

use crate::error::{CrossTabError, Result};
use crate::view::{Cell, RowRecord, TableData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// The sort key of one row for a column.
pub fn sorting_value(row: &RowRecord, column_path_id: &str) -> Result<f64> {
    match row.get(column_path_id) {
        Some(Cell::Value { value, .. }) => Ok(*value),
        Some(Cell::Header { .. }) => Err(CrossTabError::InvalidSortTarget {
            column: column_path_id.to_string(),
        }),
        None => Err(CrossTabError::UnknownColumn(column_path_id.to_string())),
    }
}

/// Stable-sorts the body rows of `table` by one column. The grand-total row
/// stays last. Fails without touching the table if sorting is disabled or
/// any row has no numeric value in that column.
pub fn sort_rows(table: &mut TableData, column_path_id: &str, direction: SortDirection) -> Result<()> {
    if !table.can_sort_columns {
        return Err(CrossTabError::SortDisabled);
    }

    let body_len = table.total_row_position().unwrap_or(table.rows.len());
    let sorted: Vec<RowRecord> = {
        let body = &table.rows[..body_len];
        let keys = body
            .iter()
            .map(|row| sorting_value(row, column_path_id))
            .collect::<Result<Vec<f64>>>()?;

        let mut order: Vec<usize> = (0..body.len()).collect();
        order.sort_by(|&a, &b| {
            let ordering = keys[a].total_cmp(&keys[b]);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        order.into_iter().map(|idx| body[idx].clone()).collect()
    };

    log_debug!("SORT", "sorted {} rows by {} {:?}", sorted.len(), column_path_id, direction);
    let totals = table.rows.split_off(body_len);
    table.rows = sorted;
    table.rows.extend(totals);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{Axis, Dimension};
    use crate::header::{HeaderNode, HeaderRole};
    use rustc_hash::FxHashMap;

    fn row(header: usize, cells: Vec<(&str, Cell)>) -> RowRecord {
        let cells: FxHashMap<String, Cell> =
            cells.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        RowRecord { header, cells }
    }

    fn brand_header(value: &str) -> HeaderNode {
        HeaderNode::dimension(Axis::Row, &Dimension::new("brand", "Brand"), value.into(), false, None)
    }

    #[test]
    fn test_sorting_value_rejects_header_cells() {
        let r = row(0, vec![("rowHeaders", Cell::header(brand_header("A"))), ("rowSum", Cell::value(3.0))]);

        assert_eq!(sorting_value(&r, "rowSum").unwrap(), 3.0);
        assert!(matches!(
            sorting_value(&r, "rowHeaders"),
            Err(CrossTabError::InvalidSortTarget { .. })
        ));
        assert!(matches!(sorting_value(&r, "missing"), Err(CrossTabError::UnknownColumn(_))));
    }

    #[test]
    fn test_sort_keeps_total_last() {
        let mut table = TableData::empty();
        table.row_headers.push(brand_header("A"));
        table.row_headers.push(brand_header("B"));
        table.row_headers.push(brand_header("C"));
        table
            .row_headers
            .push(HeaderNode::pseudo(Axis::Row, HeaderRole::ColumnSum, "Totales"));
        table.rows = vec![
            row(0, vec![("rowSum", Cell::value(2.0))]),
            row(1, vec![("rowSum", Cell::value(9.0))]),
            row(2, vec![("rowSum", Cell::value(2.0))]),
            row(3, vec![("rowSum", Cell::value(13.0))]),
        ];

        sort_rows(&mut table, "rowSum", SortDirection::Descending).unwrap();
        let order: Vec<usize> = table.rows.iter().map(|r| r.header).collect();
        assert_eq!(order, vec![1, 0, 2, 3]);

        sort_rows(&mut table, "rowSum", SortDirection::Ascending).unwrap();
        let order: Vec<usize> = table.rows.iter().map(|r| r.header).collect();
        assert_eq!(order, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_sort_disabled_leaves_table_untouched() {
        let mut table = TableData::empty();
        table.can_sort_columns = false;
        table.rows = vec![row(0, vec![("rowSum", Cell::value(1.0))])];
        let before = table.clone();

        assert!(matches!(
            sort_rows(&mut table, "rowSum", SortDirection::Ascending),
            Err(CrossTabError::SortDisabled)
        ));
        assert_eq!(table, before);
    }
}
