//! # Domain Layer
//!
//! Business rules of the billing system. Services here depend on the storage
//! traits, never on a concrete backend, and report failures as
//! `anyhow::Error` values carrying a `BillingError` where the caller needs to
//! tell cases apart.
//!
//! - `account_service`: registration, login, admin approval
//! - `farmer_service`: per-shop farmer registry
//! - `milk_collection_service`: milk entries priced from the rate chart
//! - `rate_chart_service`: the shared rate chart
//! - `import_service`: bulk farmer and milk imports
//! - `invoice`: monthly bill rendering and PDF output
//! - `session_service`: bearer tokens for the HTTP API

pub mod account_service;
pub mod commands;
pub mod errors;
pub mod farmer_service;
pub mod import_service;
pub mod invoice;
pub mod milk_collection_service;
pub mod models;
pub mod rate_chart_service;
pub mod rate_resolver;
pub mod session_service;

pub use account_service::{AccountService, AdminCredentials};
pub use errors::BillingError;
pub use farmer_service::FarmerService;
pub use import_service::ImportService;
pub use invoice::InvoiceService;
pub use milk_collection_service::MilkCollectionService;
pub use rate_chart_service::RateChartService;
pub use session_service::{SessionPrincipal, SessionService};
