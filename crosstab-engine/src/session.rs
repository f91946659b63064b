//! FILENAME: crosstab-engine/src/session.rs
// PURPOSE: Shared-state wrapper for hosts that call in from several threads.
//
// A rebuild reads the records, both dimension lists and both expansion sets,
// so every operation holds one lock across mutation and rebuild. There is no
// finer-grained sharing: tables are rebuilt wholesale, never patched.

use std::sync::{Mutex, MutexGuard};

use crate::definition::{ChildValueScope, CrossTabConfig, Record};
use crate::engine::CrossTab;
use crate::error::{CrossTabError, Result};
use crate::header::HeaderNode;
use crate::registry::{DimensionList, DimensionRegistry};
use crate::view::TableData;

pub struct CrossTabSession {
    state: Mutex<CrossTab>,
}

impl CrossTabSession {
    pub fn new(config: CrossTabConfig) -> Result<Self> {
        Ok(Self::from_crosstab(CrossTab::new(config)?))
    }

    pub fn from_crosstab(crosstab: CrossTab) -> Self {
        CrossTabSession {
            state: Mutex::new(crosstab),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, CrossTab>> {
        self.state.lock().map_err(|_| CrossTabError::StatePoisoned)
    }

    /// Runs `mutate` and rebuilds the table inside one lock scope.
    fn mutate_and_rebuild<F>(&self, operation: &str, mutate: F) -> Result<TableData>
    where
        F: FnOnce(&mut CrossTab) -> Result<()>,
    {
        let mut crosstab = self.lock()?;
        mutate(&mut *crosstab)?;
        let table = crosstab.table_data();
        log_info!(
            "SESSION",
            "{} -> columns={} rows={}",
            operation,
            table.column_headers.len(),
            table.rows.len()
        );
        Ok(table)
    }

    pub fn table_data(&self) -> Result<TableData> {
        Ok(self.lock()?.table_data())
    }

    pub fn registry(&self) -> Result<DimensionRegistry> {
        Ok(self.lock()?.registry().clone())
    }

    /// Clones the current state, e.g. to persist it on the host side.
    pub fn snapshot(&self) -> Result<CrossTab> {
        Ok(self.lock()?.clone())
    }

    pub fn expand_column(&self, header: &HeaderNode) -> Result<TableData> {
        self.mutate_and_rebuild("expand_column", |tab| tab.expand_column(header))
    }

    pub fn contract_column(&self, header: &HeaderNode) -> Result<TableData> {
        self.mutate_and_rebuild("contract_column", |tab| tab.contract_column(header))
    }

    pub fn expand_row(&self, header: &HeaderNode) -> Result<TableData> {
        self.mutate_and_rebuild("expand_row", |tab| tab.expand_row(header))
    }

    pub fn contract_row(&self, header: &HeaderNode) -> Result<TableData> {
        self.mutate_and_rebuild("contract_row", |tab| tab.contract_row(header))
    }

    pub fn reorder_dimension(&self, list: DimensionList, from: usize, to: usize) -> Result<TableData> {
        self.mutate_and_rebuild("reorder_dimension", |tab| tab.registry_mut().reorder(list, from, to))
    }

    pub fn transfer_dimension(
        &self,
        from_list: DimensionList,
        to_list: DimensionList,
        from: usize,
        to: usize,
    ) -> Result<TableData> {
        self.mutate_and_rebuild("transfer_dimension", |tab| {
            tab.registry_mut().transfer(from_list, to_list, from, to)
        })
    }

    pub fn replace_registry(&self, registry: DimensionRegistry) -> Result<TableData> {
        self.mutate_and_rebuild("replace_registry", |tab| {
            *tab.registry_mut() = registry;
            Ok(())
        })
    }

    pub fn replace_records(&self, records: Vec<Record>) -> Result<TableData> {
        self.mutate_and_rebuild("replace_records", |tab| {
            tab.set_records(records);
            Ok(())
        })
    }

    pub fn set_child_values(&self, scope: ChildValueScope) -> Result<TableData> {
        self.mutate_and_rebuild("set_child_values", |tab| {
            tab.set_child_values(scope);
            Ok(())
        })
    }

    pub fn collapse_all(&self) -> Result<TableData> {
        self.mutate_and_rebuild("collapse_all", |tab| {
            tab.collapse_all();
            Ok(())
        })
    }
}
