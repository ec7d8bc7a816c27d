//! Spreadsheet store
//!
//! The kiosk keeps its data in a spreadsheet with two tables:
//! registrations (Sheet1) and orders (Sheet2). [`SheetStore`] is the
//! pluggable boundary:
//!
//! ```text
//!          ┌───────────────────┐
//!          │  SheetStore trait │
//!          └─────────┬─────────┘
//!             ┌──────┴──────┐
//!             ▼             ▼
//!   GoogleSheetsStore   MemoryStore
//!   (Sheets v4 REST)    (tests / local dev)
//! ```
//!
//! Read-then-write sequences against the store are not transactional; see
//! [`crate::locks`] for the in-process serialization around them.

mod a1;
mod auth;
mod google;
mod memory;
mod schema;

pub use a1::{SheetRange, column_letters};
pub use auth::ServiceAccountAuth;
pub use google::GoogleSheetsStore;
pub use memory::MemoryStore;
pub use schema::{
    OrderColumnNames, OrderColumns, RegistrationColumnNames, RegistrationColumns, SheetSchema,
};

use async_trait::async_trait;
use shared::error::{AppError, ErrorCode};
use std::fmt;
use thiserror::Error;

/// Logical tables in the spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Registrations,
    Orders,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Registrations => "registrations",
            Self::Orders => "orders",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cell address relative to the rows returned by [`SheetStore::fetch_rows`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    /// Row index (0 is the header row)
    pub row: usize,
    /// Column index
    pub column: usize,
}

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spreadsheet API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Table {0} has no header row")]
    MissingHeader(Table),

    #[error("Column '{column}' not found in {table} header")]
    MissingColumn { table: Table, column: String },

    #[error("Row {row} is out of range for {table}")]
    RowOutOfRange { table: Table, row: usize },

    #[error("Invalid range '{0}'")]
    InvalidRange(String),

    #[error("Store is offline")]
    Offline,
}

impl StoreError {
    fn is_schema(&self) -> bool {
        matches!(self, Self::MissingHeader(_) | Self::MissingColumn { .. })
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Spreadsheet store error");
        if err.is_schema() {
            AppError::with_message(ErrorCode::StoreSchemaInvalid, err.to_string())
        } else {
            AppError::store_unavailable(crate::api::SYSTEM_ERROR)
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Row-oriented table access
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Short backend name for health output and logs
    fn backend_name(&self) -> &'static str;

    /// All rows of `table`, header row first. Trailing empty cells may be
    /// missing from a row.
    async fn fetch_rows(&self, table: Table) -> StoreResult<Vec<Vec<String>>>;

    /// Overwrite a single cell with a literal value
    async fn update_cell(&self, table: Table, cell: CellRef, value: &str) -> StoreResult<()>;

    /// Append a row after the last non-empty row
    async fn append_row(&self, table: Table, values: Vec<String>) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_errors_map_to_schema_code() {
        let err: AppError = StoreError::MissingColumn {
            table: Table::Orders,
            column: "학번".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::StoreSchemaInvalid);
    }

    #[test]
    fn test_transport_errors_are_generic() {
        let err: AppError = StoreError::Api {
            status: 403,
            body: "The caller does not have permission".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::StoreUnavailable);
        assert!(!err.message.contains("permission"));
    }
}
