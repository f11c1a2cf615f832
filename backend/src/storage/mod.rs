//! # Storage Module
//!
//! Persistence for the four billing tables: accounts, farmers, milk entries
//! and the rate chart.
//!
//! ## Layers
//!
//! - **`TableStorage`**: the narrow backend interface. A backend can read all
//!   rows of a table and write all rows of a table, nothing more. The CSV file
//!   backend and the in-memory backend both implement it.
//! - **`RecordStore`**: turns backend rows into typed `Table<R>` values and
//!   back (`load`, `persist`).
//! - **`TableRepository<R>`**: owns one loaded table behind a mutex. Every
//!   mutation is lock, modify, persist; a failed persist restores the previous
//!   rows.
//! - **Entity storage traits** (`AccountStorage`, `FarmerStorage`, ...): what
//!   the domain services depend on.
//!
//! ## File Layout
//!
//! ```text
//! data/
//! ├── users.csv
//! ├── farmers.csv
//! ├── milk_data.csv
//! └── rate_chart.csv
//! ```

pub mod csv;
pub mod memory;
pub mod repositories;
pub mod table;
pub mod traits;

pub use self::csv::CsvConnection;
pub use memory::MemoryConnection;
pub use repositories::{
    AccountRepository, FarmerRepository, MilkEntryRepository, RateChartRepository,
};
pub use table::{Record, RecordStore, Table, TableRepository, TableSchema};
pub use traits::{
    AccountStorage, FarmerStorage, MilkEntryStorage, RateChartStorage, StoreError, TableStorage,
};
