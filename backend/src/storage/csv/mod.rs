//! # CSV Storage Module
//!
//! File-based table storage: one CSV file per table in the data directory,
//! header row first, written through a temp file and renamed into place.
//!
//! ## File Format
//!
//! ```csv
//! ShopName,Date,FarmerID,Session,Litres,Fat,CLR,Rate,Amount
//! Anand Dairy,2024-03-01,F1,Morning,10.0,4.5,28.0,42.5,425.0
//! ```

pub mod connection;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
