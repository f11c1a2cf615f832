//! # Application Configuration
//!
//! Settings are read from a YAML file. The path comes from
//! `DAIRY_BILLING_CONFIG`, or `dairy_billing.yaml` in the working directory.
//! A missing file means defaults everywhere.
//!
//! ## YAML Format
//!
//! ```yaml
//! data_directory: "/srv/dairy/data"
//! invoice_directory: "/srv/dairy/bills"
//! bind_address: "0.0.0.0:3000"
//! admin:
//!   username: "admin"
//!   password: "change-me"
//! ```

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::AdminCredentials;

pub const CONFIG_PATH_ENV: &str = "DAIRY_BILLING_CONFIG";
pub const DATA_DIR_ENV: &str = "DAIRY_BILLING_DATA_DIR";
pub const DEFAULT_CONFIG_FILE: &str = "dairy_billing.yaml";

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the four CSV tables
    pub data_directory: PathBuf,
    /// Where invoices are written; the data directory when unset
    pub invoice_directory: Option<PathBuf>,
    pub bind_address: String,
    pub admin: AdminConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            invoice_directory: None,
            bind_address: "127.0.0.1:3000".to_string(),
            admin: AdminConfig::default(),
        }
    }
}

/// `~/Documents/Dairy Billing`, or `./data` when there is no documents folder.
pub fn default_data_directory() -> PathBuf {
    match dirs::document_dir() {
        Some(documents) => documents.join("Dairy Billing"),
        None => PathBuf::from("data"),
    }
}

impl AppConfig {
    /// Load from the configured path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = Self::load_from(&path)?;
        if let Ok(data_dir) = std::env::var(DATA_DIR_ENV) {
            info!("Data directory overridden by {}: {}", DATA_DIR_ENV, data_dir);
            config.data_directory = PathBuf::from(data_dir);
        }
        Ok(config)
    }

    /// Load a config file; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn invoice_directory(&self) -> PathBuf {
        self.invoice_directory
            .clone()
            .unwrap_or_else(|| self.data_directory.clone())
    }

    pub fn admin_credentials(&self) -> AdminCredentials {
        AdminCredentials {
            username: self.admin.username.clone(),
            password: self.admin.password.clone(),
        }
    }

    pub fn uses_default_admin_password(&self) -> bool {
        self.admin.password == DEFAULT_ADMIN_PASSWORD
    }

    /// Log a warning for settings that should not reach production
    pub fn warn_on_insecure_defaults(&self) {
        if self.uses_default_admin_password() {
            warn!("Admin password is the default; set admin.password in the config file");
        }
    }
}
