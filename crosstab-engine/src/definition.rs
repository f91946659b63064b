//! FILENAME: crosstab-engine/src/definition.rs
//! Cross-tab Definition - The serializable configuration.
//!
//! This module contains the types that DESCRIBE a cross-tab:
//! - Records (the data) and their scalar values
//! - Dimensions (the attributes users group by)
//! - The construction-time configuration, loadable from JSON
//!
//! Records are read-only inputs; the engine never mutates them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{CrossTabError, Result};

// ============================================================================
// SCALAR VALUES
// ============================================================================

/// A single dimension value or measure held by a record.
///
/// Equality is strict: numbers compare numerically, text compares by bytes,
/// and a number never equals text (`1` and `"1"` are different values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(f64),
    Text(String),
}

impl ScalarValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ScalarValue::Number(n) => Some(*n),
            ScalarValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ScalarValue::Text(s) => Some(s),
            ScalarValue::Number(_) => None,
        }
    }

    /// Hashable identity used when de-duplicating values.
    pub(crate) fn key(&self) -> ValueKey<'_> {
        match self {
            ScalarValue::Number(n) => ValueKey::Number(canonical_bits(*n)),
            ScalarValue::Text(s) => ValueKey::Text(s),
        }
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Number(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

/// De-duplication key for a `ScalarValue`.
/// All NaN values collapse into one key and `-0` equals `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey<'a> {
    Number(u64),
    Text(&'a str),
}

fn canonical_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0
    } else {
        n.to_bits()
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// One flat input record: dimension name -> value, plus the measure field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: FxHashMap<String, ScalarValue>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    /// Builder-style insert, convenient for fixtures.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ScalarValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ScalarValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reads the measure under `key`. Missing or non-numeric measures count as 0.
    pub fn measure(&self, key: &str) -> f64 {
        self.get(key).and_then(ScalarValue::as_number).unwrap_or(0.0)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<ScalarValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

// ============================================================================
// DIMENSIONS AND AXES
// ============================================================================

/// A named, user-facing attribute used for grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    /// Record field this dimension reads.
    pub name: String,

    /// Display name shown in the dimension pickers.
    pub label: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Dimension {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// One of the two groupings of the cross-tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Row,
    Column,
}

/// Which records a nested header tier discovers its values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChildValueScope {
    /// Every tier lists each value found anywhere in the records.
    #[default]
    AllRecords,
    /// A nested tier only lists values of records matching its ancestor chain.
    WithinParent,
}

// ============================================================================
// CONFIGURATION
// ============================================================================

fn default_total_label() -> String {
    "Totales".to_string()
}

/// Everything a `CrossTab` needs at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossTabConfig {
    /// The record collection.
    #[serde(default)]
    pub records: Vec<Record>,

    /// Record field summed into every cell.
    pub measure: String,

    /// Dimensions offered but not placed on an axis.
    #[serde(default)]
    pub available: Vec<Dimension>,

    /// Dimensions grouping the rows (outer to inner).
    #[serde(default)]
    pub rows: Vec<Dimension>,

    /// Dimensions grouping the columns (outer to inner).
    #[serde(default)]
    pub columns: Vec<Dimension>,

    /// Label of both grand-total headers.
    #[serde(default = "default_total_label")]
    pub total_label: String,

    /// Label of the row-label column header.
    #[serde(default)]
    pub row_labels_label: String,

    #[serde(default)]
    pub child_values: ChildValueScope,
}

impl CrossTabConfig {
    pub fn new(measure: impl Into<String>) -> Self {
        CrossTabConfig {
            records: Vec::new(),
            measure: measure.into(),
            available: Vec::new(),
            rows: Vec::new(),
            columns: Vec::new(),
            total_label: default_total_label(),
            row_labels_label: String::new(),
            child_values: ChildValueScope::default(),
        }
    }

    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    pub fn with_available(mut self, dimensions: Vec<Dimension>) -> Self {
        self.available = dimensions;
        self
    }

    pub fn with_rows(mut self, dimensions: Vec<Dimension>) -> Self {
        self.rows = dimensions;
        self
    }

    pub fn with_columns(mut self, dimensions: Vec<Dimension>) -> Self {
        self.columns = dimensions;
        self
    }

    pub fn with_child_values(mut self, scope: ChildValueScope) -> Self {
        self.child_values = scope;
        self
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CrossTabConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.measure.trim().is_empty() {
            return Err(CrossTabError::InvalidConfig(
                "measure field name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_equality() {
        assert_ne!(ScalarValue::from(1.0), ScalarValue::from("1"));
        assert_eq!(ScalarValue::from("A"), ScalarValue::from("A"));
        assert_ne!(ScalarValue::from(f64::NAN), ScalarValue::from(f64::NAN));
    }

    #[test]
    fn test_value_key_collapses_nan_and_signed_zero() {
        let nan_a = ScalarValue::from(f64::NAN);
        let nan_b = ScalarValue::from(-f64::NAN);
        assert_eq!(nan_a.key(), nan_b.key());

        let zero = ScalarValue::from(0.0);
        let neg_zero = ScalarValue::from(-0.0);
        assert_eq!(zero.key(), neg_zero.key());

        assert_ne!(ScalarValue::from(1.0).key(), ScalarValue::from("1").key());
    }

    #[test]
    fn test_measure_defaults_to_zero() {
        let record = Record::new().with("brand", "A").with("revenue", "lots");
        assert_eq!(record.measure("revenue"), 0.0);
        assert_eq!(record.measure("missing"), 0.0);
        assert_eq!(Record::new().with("revenue", 4.5).measure("revenue"), 4.5);
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "measure": "revenue",
            "records": [
                {"brand": "A", "revenue": 1},
                {"brand": "B", "revenue": 2.5}
            ],
            "columns": [{"name": "brand", "label": "Marca"}]
        }"#;

        let config = CrossTabConfig::from_json(json).unwrap();
        assert_eq!(config.records.len(), 2);
        assert_eq!(config.records[0].get("brand"), Some(&ScalarValue::from("A")));
        assert_eq!(config.records[1].measure("revenue"), 2.5);
        assert_eq!(config.columns[0].label, "Marca");
        assert_eq!(config.total_label, "Totales");
        assert_eq!(config.child_values, ChildValueScope::AllRecords);
    }

    #[test]
    fn test_config_rejects_empty_measure() {
        let err = CrossTabConfig::from_json(r#"{"measure": "  "}"#).unwrap_err();
        assert!(matches!(err, CrossTabError::InvalidConfig(_)));

        let err = CrossTabConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, CrossTabError::Config(_)));
    }
}
