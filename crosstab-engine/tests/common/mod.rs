//! FILENAME: tests/common/mod.rs
//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use crosstab_engine::{
    Axis, Cell, CrossTab, CrossTabConfig, Dimension, HeaderNode, Record, TableData,
};

/// A cross-tab plus helpers to query the table it renders.
pub struct TestHarness {
    pub crosstab: CrossTab,
}

impl TestHarness {
    pub fn new(records: Vec<Record>, rows: Vec<Dimension>, columns: Vec<Dimension>) -> Self {
        let config = CrossTabConfig::new("revenue")
            .with_records(records)
            .with_rows(rows)
            .with_columns(columns);
        TestHarness {
            crosstab: CrossTab::new(config).unwrap(),
        }
    }

    pub fn table(&self) -> TableData {
        self.crosstab.table_data()
    }

    pub fn column_ids(&self) -> Vec<String> {
        self.table().column_headers.path_ids().map(str::to_string).collect()
    }

    pub fn row_ids(&self) -> Vec<String> {
        self.table().row_headers.path_ids().map(str::to_string).collect()
    }

    /// Finds a header of the current table by path id.
    pub fn header(&self, axis: Axis, path_id: &str) -> HeaderNode {
        let table = self.table();
        let headers = match axis {
            Axis::Row => &table.row_headers,
            Axis::Column => &table.column_headers,
        };
        let idx = headers
            .position(path_id)
            .unwrap_or_else(|| panic!("no {:?} header `{}`", axis, path_id));
        headers[idx].clone()
    }

    pub fn expand_column(&mut self, path_id: &str) {
        let header = self.header(Axis::Column, path_id);
        self.crosstab.expand_column(&header).unwrap();
    }

    pub fn contract_column(&mut self, path_id: &str) {
        let header = self.header(Axis::Column, path_id);
        self.crosstab.contract_column(&header).unwrap();
    }

    pub fn expand_row(&mut self, path_id: &str) {
        let header = self.header(Axis::Row, path_id);
        self.crosstab.expand_row(&header).unwrap();
    }

    pub fn contract_row(&mut self, path_id: &str) {
        let header = self.header(Axis::Row, path_id);
        self.crosstab.contract_row(&header).unwrap();
    }
}

/// Numeric value of a cell, addressed by row header and column path ids.
pub fn value_at(table: &TableData, row_path_id: &str, column_path_id: &str) -> f64 {
    let row_idx = table
        .row_headers
        .position(row_path_id)
        .unwrap_or_else(|| panic!("no row `{}`", row_path_id));
    let row = table
        .rows
        .iter()
        .find(|r| r.header == row_idx)
        .unwrap_or_else(|| panic!("no grid row for `{}`", row_path_id));
    row.get(column_path_id)
        .and_then(Cell::number_value)
        .unwrap_or_else(|| panic!("no value at ({}, {})", row_path_id, column_path_id))
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn brand() -> Dimension {
    Dimension::new("brand", "Marca")
}

pub fn category() -> Dimension {
    Dimension::new("category", "Categoría")
}

pub fn group() -> Dimension {
    Dimension::new("group", "Grupo")
}

/// Brands A and B: A sums to 3, B to 5.
pub struct BrandFixture;

impl BrandFixture {
    pub fn records() -> Vec<Record> {
        vec![
            Record::new().with("brand", "A").with("category", "x").with("revenue", 1.0),
            Record::new().with("brand", "A").with("category", "y").with("revenue", 2.0),
            Record::new().with("brand", "B").with("category", "x").with("revenue", 5.0),
        ]
    }
}

/// Lingerie catalog used as the demo data set. Revenue sums to 15.
pub struct LingerieFixture;

impl LingerieFixture {
    pub fn records() -> Vec<Record> {
        vec![
            Self::row("Leonisa", "Lista1", "bra", 1.0),
            Self::row("Lumar", "Lista1", "panty", 2.0),
            Self::row("Mundo Joven", "Lista1", "bralete", 3.0),
            Self::row("Leo", "Lista1", "panty", 4.0),
            Self::row("Leo", "Lista2", "bra", 5.0),
        ]
    }

    pub fn total() -> f64 {
        15.0
    }

    fn row(brand: &str, category: &str, group: &str, revenue: f64) -> Record {
        Record::new()
            .with("brand", brand)
            .with("category", category)
            .with("group", group)
            .with("revenue", revenue)
    }
}
