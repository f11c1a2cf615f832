//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;

use crate::domain::models::{Account, Farmer, MilkEntry, RateChartEntry};
use crate::storage::table::TableSchema;

/// Failures while reading or writing a persisted table.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on table '{table}': {source}")]
    Io {
        table: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error on table '{table}': {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: ::csv::Error,
    },
    #[error("Corrupt table '{table}' at line {line}: {reason}")]
    Corrupt {
        table: &'static str,
        line: usize,
        reason: String,
    },
}

/// Backend interface: whole-table reads and writes of raw text rows.
///
/// `read_rows` returns `None` when the table has never been written, which
/// callers treat as an empty table. `write_rows` replaces the previous
/// content entirely.
pub trait TableStorage: Send + Sync {
    fn read_rows(&self, schema: &TableSchema) -> Result<Option<Vec<Vec<String>>>, StoreError>;

    fn write_rows(&self, schema: &TableSchema, rows: &[Vec<String>]) -> Result<(), StoreError>;
}

/// Trait defining the interface for account storage operations
pub trait AccountStorage: Send + Sync {
    /// Add a new account; fails with `DuplicateUsername` if the username exists
    fn insert_account(&self, account: &Account) -> Result<()>;

    /// Retrieve an account by username
    fn get_account(&self, username: &str) -> Result<Option<Account>>;

    /// All accounts in stored order
    fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Mark an account approved and return it; fails with `AccountNotFound`
    fn approve_account(&self, username: &str) -> Result<Account>;
}

/// Trait defining the interface for farmer storage operations
pub trait FarmerStorage: Send + Sync {
    /// Add one farmer; the farmer ID must be new within the shop
    fn insert_farmer(&self, farmer: &Farmer) -> Result<()>;

    /// Add several farmers at once, all or nothing
    fn insert_farmers(&self, farmers: Vec<Farmer>) -> Result<usize>;

    /// Retrieve a farmer by shop and farmer ID
    fn get_farmer(&self, shop_name: &str, farmer_id: &str) -> Result<Option<Farmer>>;

    /// A shop's farmers in stored order
    fn list_farmers(&self, shop_name: &str) -> Result<Vec<Farmer>>;
}

/// Trait defining the interface for milk entry storage operations
pub trait MilkEntryStorage: Send + Sync {
    /// Append one entry
    fn append_entry(&self, entry: &MilkEntry) -> Result<()>;

    /// Append several entries at once, all or nothing
    fn append_entries(&self, entries: Vec<MilkEntry>) -> Result<usize>;

    /// A shop's entries in stored order
    fn list_entries(&self, shop_name: &str) -> Result<Vec<MilkEntry>>;
}

/// Trait defining the interface for rate chart storage operations
pub trait RateChartStorage: Send + Sync {
    /// The whole chart in stored order
    fn load_chart(&self) -> Result<Vec<RateChartEntry>>;

    /// Replace the chart wholesale, returning the new row count
    fn replace_chart(&self, entries: Vec<RateChartEntry>) -> Result<usize>;
}
