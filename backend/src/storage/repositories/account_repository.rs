use anyhow::Result;
use log::info;

use crate::domain::errors::BillingError;
use crate::domain::models::Account;
use crate::storage::table::{Record, TableRepository, TableSchema};
use crate::storage::traits::AccountStorage;

/// Repository for `users.csv`
pub type AccountRepository = TableRepository<Account>;

impl Record for Account {
    const SCHEMA: TableSchema = TableSchema {
        name: "users",
        file_name: "users.csv",
        columns: &["Username", "Password", "ShopName", "Approved"],
    };

    fn to_row(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.password_hash.clone(),
            self.shop_name.clone(),
            if self.approved { "Yes" } else { "No" }.to_string(),
        ]
    }

    fn from_row(row: &[String]) -> std::result::Result<Self, String> {
        let approved = match row[3].trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => true,
            "no" | "false" => false,
            other => return Err(format!("Approved must be Yes or No, got '{}'", other)),
        };
        Ok(Account {
            username: row[0].clone(),
            password_hash: row[1].clone(),
            shop_name: row[2].clone(),
            approved,
        })
    }
}

impl AccountStorage for TableRepository<Account> {
    fn insert_account(&self, account: &Account) -> Result<()> {
        self.mutate(|table| {
            if table.rows().iter().any(|a| a.username == account.username) {
                return Err(BillingError::DuplicateUsername(account.username.clone()).into());
            }
            table.append(account.clone());
            Ok(())
        })?;
        info!("Stored account '{}' for shop '{}'", account.username, account.shop_name);
        Ok(())
    }

    fn get_account(&self, username: &str) -> Result<Option<Account>> {
        self.find(|a| a.username == username)
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        self.snapshot()
    }

    fn approve_account(&self, username: &str) -> Result<Account> {
        self.mutate(|table| {
            let account = table
                .rows_mut()
                .iter_mut()
                .find(|a| a.username == username)
                .ok_or_else(|| BillingError::AccountNotFound(username.to_string()))?;
            account.approved = true;
            Ok(account.clone())
        })
    }
}
