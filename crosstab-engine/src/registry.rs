//! FILENAME: crosstab-engine/src/registry.rs
//! Dimension Registry - which dimensions are available and which are chosen
//! for each axis.
//!
//! The three lists are meant to be mutually exclusive, but keeping them so
//! is the caller's job: the registry moves entries around on request and
//! never checks disjointness.

use serde::{Deserialize, Serialize};

use crate::definition::{Axis, Dimension};
use crate::error::{CrossTabError, Result};

/// Identifies one of the three dimension lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionList {
    Available,
    Rows,
    Columns,
}

impl DimensionList {
    pub fn for_axis(axis: Axis) -> Self {
        match axis {
            Axis::Row => DimensionList::Rows,
            Axis::Column => DimensionList::Columns,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionRegistry {
    pub available: Vec<Dimension>,
    pub rows: Vec<Dimension>,
    pub columns: Vec<Dimension>,
}

impl DimensionRegistry {
    pub fn new(available: Vec<Dimension>, rows: Vec<Dimension>, columns: Vec<Dimension>) -> Self {
        DimensionRegistry {
            available,
            rows,
            columns,
        }
    }

    pub fn list(&self, kind: DimensionList) -> &[Dimension] {
        match kind {
            DimensionList::Available => &self.available,
            DimensionList::Rows => &self.rows,
            DimensionList::Columns => &self.columns,
        }
    }

    pub fn list_mut(&mut self, kind: DimensionList) -> &mut Vec<Dimension> {
        match kind {
            DimensionList::Available => &mut self.available,
            DimensionList::Rows => &mut self.rows,
            DimensionList::Columns => &mut self.columns,
        }
    }

    pub fn set(&mut self, kind: DimensionList, dimensions: Vec<Dimension>) {
        *self.list_mut(kind) = dimensions;
    }

    /// Dimensions chosen for an axis, outer to inner.
    pub fn chosen(&self, axis: Axis) -> &[Dimension] {
        self.list(DimensionList::for_axis(axis))
    }

    /// Finds the first list holding a dimension with this name.
    pub fn locate(&self, name: &str) -> Option<(DimensionList, usize)> {
        [DimensionList::Available, DimensionList::Rows, DimensionList::Columns]
            .into_iter()
            .find_map(|kind| {
                self.list(kind)
                    .iter()
                    .position(|d| d.name == name)
                    .map(|idx| (kind, idx))
            })
    }

    /// Names that appear in more than one list (or twice in one).
    pub fn overlapping_names(&self) -> Vec<&str> {
        let mut seen = rustc_hash::FxHashSet::default();
        let mut overlapping = Vec::new();
        for dimension in self.available.iter().chain(&self.rows).chain(&self.columns) {
            if !seen.insert(dimension.name.as_str()) && !overlapping.contains(&dimension.name.as_str()) {
                overlapping.push(dimension.name.as_str());
            }
        }
        overlapping
    }

    /// Moves a dimension inside one list. `to` is clamped to the last slot.
    pub fn reorder(&mut self, kind: DimensionList, from: usize, to: usize) -> Result<()> {
        let list = self.list_mut(kind);
        if from >= list.len() {
            return Err(CrossTabError::DimensionIndexOutOfRange {
                list: kind,
                index: from,
                len: list.len(),
            });
        }

        let to = to.min(list.len() - 1);
        if from != to {
            let dimension = list.remove(from);
            list.insert(to, dimension);
        }
        Ok(())
    }

    /// Moves a dimension from one list into another at `to` (clamped to the
    /// end of the target list).
    pub fn transfer(
        &mut self,
        from_kind: DimensionList,
        to_kind: DimensionList,
        from: usize,
        to: usize,
    ) -> Result<()> {
        if from_kind == to_kind {
            return self.reorder(from_kind, from, to);
        }

        let source = self.list_mut(from_kind);
        if from >= source.len() {
            return Err(CrossTabError::DimensionIndexOutOfRange {
                list: from_kind,
                index: from,
                len: source.len(),
            });
        }
        let dimension = source.remove(from);

        let target = self.list_mut(to_kind);
        let to = to.min(target.len());
        target.insert(to, dimension);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> DimensionRegistry {
        DimensionRegistry::new(
            vec![
                Dimension::new("category", "Category"),
                Dimension::new("group", "Group"),
            ],
            Vec::new(),
            vec![Dimension::new("brand", "Brand")],
        )
    }

    fn names(dimensions: &[Dimension]) -> Vec<&str> {
        dimensions.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_transfer_between_lists() {
        let mut reg = registry();
        reg.transfer(DimensionList::Available, DimensionList::Rows, 1, 0).unwrap();

        assert_eq!(names(&reg.available), vec!["category"]);
        assert_eq!(names(reg.chosen(Axis::Row)), vec!["group"]);
    }

    #[test]
    fn test_transfer_clamps_target_index() {
        let mut reg = registry();
        reg.transfer(DimensionList::Available, DimensionList::Columns, 0, 99).unwrap();

        assert_eq!(names(reg.chosen(Axis::Column)), vec!["brand", "category"]);
    }

    #[test]
    fn test_reorder_within_list() {
        let mut reg = registry();
        reg.reorder(DimensionList::Available, 0, 5).unwrap();
        assert_eq!(names(&reg.available), vec!["group", "category"]);

        reg.reorder(DimensionList::Available, 1, 0).unwrap();
        assert_eq!(names(&reg.available), vec!["category", "group"]);
    }

    #[test]
    fn test_out_of_range_source_is_an_error() {
        let mut reg = registry();
        let err = reg.transfer(DimensionList::Rows, DimensionList::Columns, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            CrossTabError::DimensionIndexOutOfRange { list: DimensionList::Rows, index: 0, len: 0 }
        ));
        // Nothing moved
        assert_eq!(reg, registry());
    }

    #[test]
    fn test_locate_and_overlap() {
        let mut reg = registry();
        assert_eq!(reg.locate("brand"), Some((DimensionList::Columns, 0)));
        assert_eq!(reg.locate("nope"), None);
        assert!(reg.overlapping_names().is_empty());

        reg.rows.push(Dimension::new("brand", "Brand"));
        assert_eq!(reg.overlapping_names(), vec!["brand"]);
    }
}
