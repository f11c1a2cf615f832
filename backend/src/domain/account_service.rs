use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::accounts::{LoginCommand, RegisterAccountCommand};
use crate::domain::errors::BillingError;
use crate::domain::models::{Account, AdminSession};
use crate::storage::traits::AccountStorage;

/// The single admin login, taken from configuration.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Service for shopkeeper registration, login and admin approval
#[derive(Clone)]
pub struct AccountService {
    account_repository: Arc<dyn AccountStorage>,
    admin: AdminCredentials,
}

impl AccountService {
    /// Create a new AccountService
    pub fn new(account_repository: Arc<dyn AccountStorage>, admin: AdminCredentials) -> Self {
        Self {
            account_repository,
            admin,
        }
    }

    /// Register a shopkeeper; the account starts unapproved
    pub fn register(&self, command: RegisterAccountCommand) -> Result<Account> {
        let username = command.username.trim();
        let shop_name = command.shop_name.trim();
        info!("Registering account '{}' for shop '{}'", username, shop_name);

        if username.is_empty() || command.password.is_empty() || shop_name.is_empty() {
            return Err(BillingError::validation("Fill all fields.").into());
        }

        let account = Account::pending(
            username.to_string(),
            hash_password(&command.password)?,
            shop_name.to_string(),
        );
        self.account_repository.insert_account(&account)?;

        info!("Registered account '{}', waiting for admin approval", username);
        Ok(account)
    }

    /// Authenticate a shopkeeper. Unknown user, wrong password and pending
    /// approval all fail the same way.
    pub fn login(&self, command: LoginCommand) -> Result<Account> {
        let username = command.username.trim();
        info!("Login attempt for '{}'", username);

        let Some(account) = self.account_repository.get_account(username)? else {
            warn!("Login failed for '{}': unknown user", username);
            return Err(BillingError::InvalidCredentials.into());
        };

        if !verify_password(&command.password, &account.password_hash) {
            warn!("Login failed for '{}': wrong password", username);
            return Err(BillingError::InvalidCredentials.into());
        }

        if !account.approved {
            warn!("Login refused for '{}': not approved yet", username);
            return Err(BillingError::InvalidCredentials.into());
        }

        info!("Logged in as shop '{}'", account.shop_name);
        Ok(account)
    }

    /// Check the admin credentials and hand out the approval capability
    pub fn admin_login(&self, command: LoginCommand) -> Result<AdminSession> {
        if command.username == self.admin.username && command.password == self.admin.password {
            info!("Admin '{}' logged in", command.username);
            Ok(AdminSession::new(command.username))
        } else {
            warn!("Invalid admin credentials for '{}'", command.username);
            Err(BillingError::InvalidCredentials.into())
        }
    }

    /// Approve a pending account; approving twice changes nothing
    pub fn approve(&self, admin: &AdminSession, username: &str) -> Result<Account> {
        info!("Admin '{}' approving '{}'", admin.username(), username);

        if let Some(existing) = self.account_repository.get_account(username)? {
            if existing.approved {
                info!("Account '{}' was already approved", username);
                return Ok(existing);
            }
        }

        let account = self.account_repository.approve_account(username)?;
        info!("{} approved", account.username);
        Ok(account)
    }

    /// Accounts waiting for approval, in registration order
    pub fn list_pending(&self, admin: &AdminSession) -> Result<Vec<Account>> {
        let pending: Vec<Account> = self
            .account_repository
            .list_accounts()?
            .into_iter()
            .filter(|a| !a.approved)
            .collect();
        info!("Admin '{}' sees {} pending accounts", admin.username(), pending.len());
        Ok(pending)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
}

/// Verify a password against a stored hash. A stored value that is not a
/// valid hash never verifies.
fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
