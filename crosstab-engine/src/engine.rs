//! FILENAME: crosstab-engine/src/engine.rs
//! Cross-tab Engine - turns records plus dimension/expansion state into a
//! renderable table.
//!
//! Algorithm (one pure pass per query):
//! 1. Build each axis' header sequence: distinct values of the first chosen
//!    dimension in first-occurrence order, recursing into the next dimension
//!    under every expanded node (pre-order flattening)
//! 2. Add pseudo headers: row-label column in front and grand-total column
//!    at the end of the columns, grand-total row at the end of the rows
//! 3. For every (row, column) pair, AND together the ancestor predicates of
//!    both headers and sum the measure over the matching records

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::definition::{Axis, ChildValueScope, CrossTabConfig, Dimension, Record, ScalarValue};
use crate::error::{CrossTabError, Result};
use crate::expansion::{ExpansionSet, ExpansionState};
use crate::format::format_value;
use crate::header::{AxisHeaders, HeaderNode, HeaderRole};
use crate::registry::DimensionRegistry;
use crate::view::{Cell, DrillDownResult, RowRecord, TableData};

// ============================================================================
// PREDICATES
// ============================================================================

/// `record[dimension] == value`, with strict equality.
#[derive(Debug, Clone, Copy)]
struct Predicate<'a> {
    dimension: &'a str,
    value: &'a ScalarValue,
}

impl Predicate<'_> {
    /// A record lacking the field never matches.
    fn matches(&self, record: &Record) -> bool {
        record.get(self.dimension).is_some_and(|v| v == self.value)
    }
}

type Predicates<'a> = SmallVec<[Predicate<'a>; 8]>;

/// Adds one predicate per dimension node on the chain from `idx` to its root.
/// Pseudo headers carry no constraint.
fn push_chain_predicates<'a>(headers: &'a AxisHeaders, idx: usize, out: &mut Predicates<'a>) {
    for node in headers.ancestors(idx) {
        if node.is_pseudo() {
            continue;
        }
        out.push(Predicate {
            dimension: &node.dimension_name,
            value: &node.value,
        });
    }
}

fn matches_all(record: &Record, predicates: &[Predicate<'_>]) -> bool {
    predicates.iter().all(|p| p.matches(record))
}

// ============================================================================
// HEADER TREE BUILDER
// ============================================================================

struct AxisBuilder<'a> {
    axis: Axis,
    records: &'a [Record],
    expanded: &'a ExpansionSet,
    scope: ChildValueScope,
}

impl AxisBuilder<'_> {
    fn build(&self, dimensions: &[Dimension]) -> AxisHeaders {
        let mut headers = AxisHeaders::new();
        self.build_level(dimensions, None, &mut headers);
        headers
    }

    /// Appends one tier (and any expanded subtrees) to `out`.
    /// Returns the number of nodes created at this tier.
    fn build_level(
        &self,
        dimensions: &[Dimension],
        parent: Option<usize>,
        out: &mut AxisHeaders,
    ) -> usize {
        let Some((dimension, rest)) = dimensions.split_first() else {
            return 0;
        };

        let values = self.distinct_values(dimension, parent, out);
        let can_expand = !rest.is_empty();
        let tier_len = values.len();

        let mut path_labels = FxHashSet::default();
        for value in values {
            let label = format_value(&value);
            let path_label = unique_path_label(&label, &value, &mut path_labels);
            let node = HeaderNode::with_path_label(
                self.axis,
                dimension,
                value,
                &path_label,
                label,
                can_expand,
                parent.map(|idx| (idx, &out[idx])),
            );
            let wants_children = !self.expanded.is_empty() && self.expanded.contains(&node.path_id);
            let idx = out.push(node);

            if wants_children {
                let children = self.build_level(rest, Some(idx), out);
                // An expansion that yields nothing must not render as expanded.
                if children > 0 {
                    if let Some(node) = out.node_mut(idx) {
                        node.is_expanded = true;
                    }
                }
            }
        }

        tier_len
    }

    /// Distinct values of `dimension` in first-occurrence order. Records
    /// lacking the field contribute no value.
    fn distinct_values(
        &self,
        dimension: &Dimension,
        parent: Option<usize>,
        out: &AxisHeaders,
    ) -> Vec<ScalarValue> {
        let mut scope_filter = Predicates::new();
        if let (ChildValueScope::WithinParent, Some(parent)) = (self.scope, parent) {
            push_chain_predicates(out, parent, &mut scope_filter);
        }

        let mut seen = FxHashSet::default();
        let mut values = Vec::new();
        for record in self.records {
            if !matches_all(record, &scope_filter) {
                continue;
            }
            let Some(value) = record.get(&dimension.name) else {
                continue;
            };
            if seen.insert(value.key()) {
                values.push(value.clone());
            }
        }
        values
    }
}

/// Picks the label used in a node's path token. Distinct values that display
/// the same (the number `1` and the text `"1"`) would otherwise share a
/// `path_id` and a cell key, so a later-seen duplicate is qualified by its
/// type, then numbered if still taken. First-seen values keep the plain label.
fn unique_path_label(label: &str, value: &ScalarValue, used: &mut FxHashSet<String>) -> String {
    if used.insert(label.to_string()) {
        return label.to_string();
    }

    let kind = match value {
        ScalarValue::Number(_) => "number",
        ScalarValue::Text(_) => "text",
    };
    let mut candidate = format!("{}#{}", label, kind);
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}#{}{}", label, kind, n);
        n += 1;
    }
    candidate
}

// ============================================================================
// CELL AGGREGATOR
// ============================================================================

/// Computes the cell where row header `row` meets column header `column`.
/// Returns `None` if either index is out of range.
pub fn compute_cell(
    records: &[Record],
    measure: &str,
    rows: &AxisHeaders,
    row: usize,
    columns: &AxisHeaders,
    column: usize,
) -> Option<Cell> {
    if row >= rows.len() || column >= columns.len() {
        return None;
    }
    Some(cell_at(records, measure, rows, row, columns, column))
}

fn cell_at(
    records: &[Record],
    measure: &str,
    rows: &AxisHeaders,
    row: usize,
    columns: &AxisHeaders,
    column: usize,
) -> Cell {
    let row_header = &rows[row];
    let column_header = &columns[column];

    // The row-label column surfaces the header on the other side.
    match (row_header.role, column_header.role) {
        (HeaderRole::RowLabels, _) => return Cell::header(column_header.clone()),
        (_, HeaderRole::RowLabels) => return Cell::header(row_header.clone()),
        _ => {}
    }

    let mut predicates = Predicates::new();
    push_chain_predicates(columns, column, &mut predicates);
    push_chain_predicates(rows, row, &mut predicates);

    let sum: f64 = records
        .iter()
        .filter(|record| matches_all(record, &predicates))
        .map(|record| record.measure(measure))
        .sum();

    Cell::value(sum)
}

// ============================================================================
// CROSS-TAB CONTROLLER
// ============================================================================

/// Owns the record collection, dimension registry and expansion state, and
/// answers table queries against them.
#[derive(Debug, Clone)]
pub struct CrossTab {
    records: Vec<Record>,
    measure: String,
    registry: DimensionRegistry,
    expansion: ExpansionState,
    total_label: String,
    row_labels_label: String,
    child_values: ChildValueScope,
}

impl CrossTab {
    pub fn new(config: CrossTabConfig) -> Result<Self> {
        config.validate()?;

        let registry = DimensionRegistry::new(config.available, config.rows, config.columns);
        let overlapping = registry.overlapping_names();
        if !overlapping.is_empty() {
            log_warn!("CROSSTAB", "dimensions listed more than once: {:?}", overlapping);
        }

        log_info!(
            "CROSSTAB",
            "created records={} measure={} rows={} columns={}",
            config.records.len(),
            config.measure,
            registry.rows.len(),
            registry.columns.len()
        );

        Ok(CrossTab {
            records: config.records,
            measure: config.measure,
            registry,
            expansion: ExpansionState::new(),
            total_label: config.total_label,
            row_labels_label: config.row_labels_label,
            child_values: config.child_values,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Replaces the record collection. Expansion state is kept; ids that no
    /// longer match any header simply stop matching.
    pub fn set_records(&mut self, records: Vec<Record>) {
        log_debug!("CROSSTAB", "set_records count={}", records.len());
        self.records = records;
    }

    pub fn measure(&self) -> &str {
        &self.measure
    }

    pub fn registry(&self) -> &DimensionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DimensionRegistry {
        &mut self.registry
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn child_values(&self) -> ChildValueScope {
        self.child_values
    }

    pub fn set_child_values(&mut self, scope: ChildValueScope) {
        self.child_values = scope;
    }

    // ------------------------------------------------------------------------
    // Expand / contract
    // ------------------------------------------------------------------------

    pub fn expand_column(&mut self, header: &HeaderNode) -> Result<()> {
        self.expansion.expand(Axis::Column, header).map(|_| ())
    }

    pub fn contract_column(&mut self, header: &HeaderNode) -> Result<()> {
        self.expansion.contract(Axis::Column, header).map(|_| ())
    }

    pub fn expand_row(&mut self, header: &HeaderNode) -> Result<()> {
        self.expansion.expand(Axis::Row, header).map(|_| ())
    }

    pub fn contract_row(&mut self, header: &HeaderNode) -> Result<()> {
        self.expansion.contract(Axis::Row, header).map(|_| ())
    }

    /// Collapses everything on both axes.
    pub fn collapse_all(&mut self) {
        self.expansion.clear();
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Header sequence of one axis, without pseudo headers.
    pub fn axis_headers(&self, axis: Axis) -> AxisHeaders {
        AxisBuilder {
            axis,
            records: &self.records,
            expanded: self.expansion.axis(axis),
            scope: self.child_values,
        }
        .build(self.registry.chosen(axis))
    }

    /// Builds the full table for the current state.
    pub fn table_data(&self) -> TableData {
        // Emptiness follows the chosen dimensions, not the records: with
        // dimensions chosen but no records the totals still render as 0.
        if self.registry.chosen(Axis::Column).is_empty() && self.registry.chosen(Axis::Row).is_empty() {
            log_debug!("CROSSTAB", "no dimensions chosen, returning empty table");
            return TableData::empty();
        }

        let mut column_headers = self.axis_headers(Axis::Column);
        let mut row_headers = self.axis_headers(Axis::Row);

        // Totals are one more header on each axis, so the rows-only,
        // columns-only and both-axes layouts share one grid path.
        column_headers.prepend(HeaderNode::pseudo(
            Axis::Column,
            HeaderRole::RowLabels,
            &self.row_labels_label,
        ));
        column_headers.push(HeaderNode::pseudo(Axis::Column, HeaderRole::RowSum, &self.total_label));
        row_headers.push(HeaderNode::pseudo(Axis::Row, HeaderRole::ColumnSum, &self.total_label));

        let rows: Vec<RowRecord> = (0..row_headers.len())
            .map(|row| RowRecord {
                header: row,
                cells: column_headers
                    .iter()
                    .enumerate()
                    .map(|(column, header)| {
                        let cell = cell_at(
                            &self.records,
                            &self.measure,
                            &row_headers,
                            row,
                            &column_headers,
                            column,
                        );
                        (header.path_id.clone(), cell)
                    })
                    .collect(),
            })
            .collect();

        let can_sort_columns = !row_headers.iter().any(|h| h.is_expanded);

        log_debug!(
            "CROSSTAB",
            "built table columns={} rows={} can_sort_columns={}",
            column_headers.len(),
            rows.len(),
            can_sort_columns
        );

        TableData {
            column_headers,
            row_headers,
            rows,
            can_sort_columns,
        }
    }

    /// Lists the records aggregated into one value cell of `table`.
    /// `row` is a display position in `table.rows`.
    pub fn drill_down(&self, table: &TableData, row: usize, column_path_id: &str) -> Result<DrillDownResult> {
        let row_record = table.rows.get(row).ok_or(CrossTabError::UnknownRow(row))?;
        let column = table
            .column_headers
            .position(column_path_id)
            .ok_or_else(|| CrossTabError::UnknownColumn(column_path_id.to_string()))?;
        let row_header = table
            .row_headers
            .get(row_record.header)
            .ok_or(CrossTabError::UnknownRow(row))?;
        let column_header = &table.column_headers[column];

        if row_header.role == HeaderRole::RowLabels || column_header.role == HeaderRole::RowLabels {
            return Err(CrossTabError::NotAValueCell {
                column: column_path_id.to_string(),
            });
        }

        let mut predicates = Predicates::new();
        push_chain_predicates(&table.column_headers, column, &mut predicates);
        push_chain_predicates(&table.row_headers, row_record.header, &mut predicates);

        let record_indices: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| matches_all(record, &predicates))
            .map(|(idx, _)| idx)
            .collect();
        let total: f64 = record_indices
            .iter()
            .map(|&idx| self.records[idx].measure(&self.measure))
            .sum();

        log_debug!(
            "CROSSTAB",
            "drill_down row={} column={} matches={}",
            row_header.path_id,
            column_path_id,
            record_indices.len()
        );

        Ok(DrillDownResult {
            row_path_id: row_header.path_id.clone(),
            column_path_id: column_path_id.to_string(),
            record_indices,
            total,
        })
    }
}
