//! # Dairy Billing Backend
//!
//! Billing service for village milk collection shops: shopkeeper accounts
//! with admin approval, farmer registries, milk collection priced from a
//! shared rate chart, bulk imports and monthly PDF bills.
//!
//! ## Architecture
//!
//! - **Storage** (`storage`): CSV tables behind entity storage traits
//! - **Domain** (`domain`): the services holding the business rules
//! - **IO** (`io`): the REST API and the CSV/XLSX upload readers
//!
//! `initialize_backend` opens the tables and wires the services into an
//! `AppState`; `create_router` mounts the REST API on it.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{http::Method, Router};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::domain::{
    AccountService, AdminCredentials, FarmerService, ImportService, InvoiceService,
    MilkCollectionService, RateChartService, SessionService,
};
use crate::storage::{
    AccountRepository, CsvConnection, FarmerRepository, MilkEntryRepository, RateChartRepository,
    RecordStore, TableStorage,
};

/// Services shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub farmer_service: FarmerService,
    pub milk_collection_service: MilkCollectionService,
    pub rate_chart_service: RateChartService,
    pub import_service: ImportService,
    pub invoice_service: InvoiceService,
    pub session_service: SessionService,
}

/// Open the CSV tables in the configured data directory and build the state
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up storage in {}", config.data_directory.display());
    let connection = CsvConnection::new(&config.data_directory)?;

    initialize_with_storage(
        Arc::new(connection),
        config.admin_credentials(),
        config.invoice_directory(),
    )
}

/// Build the state on any table backend. A table that exists but cannot be
/// read aborts startup.
pub fn initialize_with_storage(
    backend: Arc<dyn TableStorage>,
    admin: AdminCredentials,
    invoice_directory: PathBuf,
) -> Result<AppState> {
    let store = RecordStore::new(backend);

    info!("Loading tables");
    let accounts = Arc::new(
        AccountRepository::open(store.clone()).context("Failed to load the accounts table")?,
    );
    let farmers = Arc::new(
        FarmerRepository::open(store.clone()).context("Failed to load the farmers table")?,
    );
    let milk = Arc::new(
        MilkEntryRepository::open(store.clone()).context("Failed to load the milk table")?,
    );
    let rates = Arc::new(
        RateChartRepository::open(store).context("Failed to load the rate chart table")?,
    );

    info!("Setting up domain services");
    let app_state = AppState {
        account_service: AccountService::new(accounts, admin),
        farmer_service: FarmerService::new(farmers.clone()),
        milk_collection_service: MilkCollectionService::new(
            milk.clone(),
            farmers.clone(),
            rates.clone(),
        ),
        rate_chart_service: RateChartService::new(rates.clone()),
        import_service: ImportService::new(farmers, milk.clone(), rates),
        invoice_service: InvoiceService::new(milk, invoice_directory),
        session_service: SessionService::new(),
    };

    Ok(app_state)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .nest("/api", io::rest::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
