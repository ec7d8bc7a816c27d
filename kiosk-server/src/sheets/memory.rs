//! In-memory backend
//!
//! Used by the test suite and for local development without credentials.
//! Behaves like the Sheets API where it matters: rows are returned as
//! stored (short rows stay short) and appends go after the last row.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{
    CellRef, OrderColumnNames, RegistrationColumnNames, SheetStore, StoreError, StoreResult, Table,
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Table, Vec<Vec<String>>>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with only the header rows, in the order the registration form
    /// produces them
    pub fn with_headers(
        registrations: &RegistrationColumnNames,
        orders: &OrderColumnNames,
    ) -> Self {
        Self::new()
            .with_table(
                Table::Registrations,
                vec![vec![
                    registrations.registered_at.clone(),
                    registrations.subscription_option.clone(),
                    registrations.name.clone(),
                    registrations.phone.clone(),
                    registrations.student_id.clone(),
                    registrations.consent.clone(),
                    registrations.payment.clone(),
                ]],
            )
            .with_table(
                Table::Orders,
                vec![vec![
                    orders.student_id.clone(),
                    orders.beverage.clone(),
                    orders.timestamp.clone(),
                ]],
            )
    }

    pub fn with_table(self, table: Table, rows: Vec<Vec<String>>) -> Self {
        self.tables.write().insert(table, rows);
        self
    }

    /// Snapshot of a table
    pub fn rows(&self, table: Table) -> Vec<Vec<String>> {
        self.tables.read().get(&table).cloned().unwrap_or_default()
    }

    pub fn push_row(&self, table: Table, row: Vec<String>) {
        self.tables.write().entry(table).or_default().push(row);
    }

    /// Simulate an unreachable store
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Offline)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SheetStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_rows(&self, table: Table) -> StoreResult<Vec<Vec<String>>> {
        self.check_online()?;
        Ok(self.rows(table))
    }

    async fn update_cell(&self, table: Table, cell: CellRef, value: &str) -> StoreResult<()> {
        self.check_online()?;
        let mut tables = self.tables.write();
        let row = tables
            .get_mut(&table)
            .and_then(|rows| rows.get_mut(cell.row))
            .ok_or(StoreError::RowOutOfRange {
                table,
                row: cell.row,
            })?;

        if row.len() <= cell.column {
            row.resize(cell.column + 1, String::new());
        }
        row[cell.column] = value.to_string();
        Ok(())
    }

    async fn append_row(&self, table: Table, values: Vec<String>) -> StoreResult<()> {
        self.check_online()?;
        self.push_row(table, values);
        Ok(())
    }
}
