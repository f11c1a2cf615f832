//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod accounts {
    /// Input for registering a shopkeeper.
    #[derive(Debug, Clone)]
    pub struct RegisterAccountCommand {
        pub username: String,
        pub password: String,
        pub shop_name: String,
    }

    /// Input for shopkeeper or admin login.
    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub username: String,
        pub password: String,
    }
}

pub mod farmers {
    use crate::domain::models::Farmer;

    /// Input for adding a farmer to a shop.
    #[derive(Debug, Clone)]
    pub struct AddFarmerCommand {
        pub shop_name: String,
        pub farmer_id: String,
        pub name: String,
        pub village: String,
        pub phone: String,
    }

    /// Result of listing a shop's farmers.
    #[derive(Debug, Clone)]
    pub struct ListFarmersResult {
        pub farmers: Vec<Farmer>,
    }
}

pub mod milk {
    use chrono::NaiveDate;

    use crate::domain::models::{MilkEntry, Session};

    /// Input for recording one milk collection.
    #[derive(Debug, Clone)]
    pub struct RecordMilkEntryCommand {
        pub shop_name: String,
        /// Collection date; today when not given.
        pub date: Option<NaiveDate>,
        pub farmer_id: String,
        pub session: Session,
        pub litres: f64,
        pub fat: f64,
        pub clr: f64,
    }

    /// Result of recording a milk entry.
    #[derive(Debug, Clone)]
    pub struct RecordMilkEntryResult {
        pub entry: MilkEntry,
        /// False when the (fat, clr) pair was not in the rate chart and the
        /// entry was saved with a zero rate.
        pub rate_matched: bool,
    }

    /// Result of listing a shop's milk entries.
    #[derive(Debug, Clone)]
    pub struct ListMilkEntriesResult {
        pub entries: Vec<MilkEntry>,
    }
}

pub mod imports {
    use std::fmt;

    /// Which table an import landed in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ImportKind {
        Farmers,
        MilkEntries,
    }

    impl fmt::Display for ImportKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ImportKind::Farmers => f.write_str("farmers"),
                ImportKind::MilkEntries => f.write_str("milk_entries"),
            }
        }
    }

    /// Result of an import.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ImportResult {
        pub kind: ImportKind,
        pub imported: usize,
    }
}

pub mod invoices {
    use std::path::PathBuf;

    /// A rendered and saved invoice.
    #[derive(Debug, Clone)]
    pub struct GeneratedInvoice {
        pub file_path: PathBuf,
        pub pdf: Vec<u8>,
        pub row_count: usize,
        pub page_count: usize,
    }
}
