//! FILENAME: crosstab-engine/src/expansion.rs
//! Expansion State - which header nodes are drilled into, per axis.
//!
//! State is keyed by `path_id` text, never by header instance, so it
//! survives the wholesale rebuild of headers on every query. Collapsing a
//! node also collapses every descendant (all ids that extend its path).

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::definition::Axis;
use crate::error::{CrossTabError, Result};
use crate::header::HeaderNode;

/// Set of expanded path ids for one axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionSet {
    ids: FxHashSet<String>,
}

impl ExpansionSet {
    pub fn new() -> Self {
        ExpansionSet::default()
    }

    pub fn contains(&self, path_id: &str) -> bool {
        self.ids.contains(path_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Returns true if the id was not present yet.
    pub fn insert(&mut self, path_id: impl Into<String>) -> bool {
        self.ids.insert(path_id.into())
    }

    /// Removes `path_id` and every id having it as a prefix.
    /// Returns how many ids were removed.
    pub fn remove_subtree(&mut self, path_id: &str) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| !id.starts_with(path_id));
        before - self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// The two per-axis expansion sets. Empty at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionState {
    pub rows: ExpansionSet,
    pub columns: ExpansionSet,
}

impl ExpansionState {
    pub fn new() -> Self {
        ExpansionState::default()
    }

    pub fn axis(&self, axis: Axis) -> &ExpansionSet {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut ExpansionSet {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        }
    }

    /// Marks `header` as expanded. Idempotent.
    pub fn expand(&mut self, axis: Axis, header: &HeaderNode) -> Result<bool> {
        check_target("expand", axis, header)?;
        log_debug!("EXPAND", "expand {:?} {}", axis, header.path_id);
        Ok(self.axis_mut(axis).insert(header.path_id.as_str()))
    }

    /// Collapses `header` and all of its descendants. Idempotent; collapsing
    /// a node that was never expanded removes nothing.
    pub fn contract(&mut self, axis: Axis, header: &HeaderNode) -> Result<usize> {
        check_target("contract", axis, header)?;
        let removed = self.axis_mut(axis).remove_subtree(&header.path_id);
        log_debug!("EXPAND", "contract {:?} {} removed={}", axis, header.path_id, removed);
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.columns.clear();
    }
}

/// Only dimension headers of the matching axis can be expanded or contracted.
fn check_target(operation: &'static str, axis: Axis, header: &HeaderNode) -> Result<()> {
    if header.is_pseudo() {
        return Err(CrossTabError::UnsupportedMutation {
            operation,
            reason: format!("`{}` is a pseudo header", header.path_id),
        });
    }
    if header.axis != axis {
        return Err(CrossTabError::UnsupportedMutation {
            operation,
            reason: format!(
                "`{}` is a {:?} header, not a {:?} header",
                header.path_id, header.axis, axis
            ),
        });
    }
    Ok(())
}
