use serde::{Deserialize, Serialize};

/// A shopkeeper account.
///
/// `password_hash` holds an Argon2id PHC string; the plaintext password is
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub password_hash: String,
    pub shop_name: String,
    pub approved: bool,
}

impl Account {
    /// A freshly registered account waiting for admin approval.
    pub fn pending(username: String, password_hash: String, shop_name: String) -> Self {
        Self {
            username,
            password_hash,
            shop_name,
            approved: false,
        }
    }
}

/// Proof that the admin credentials were checked.
///
/// Only `AccountService::admin_login` can build one, so holding an
/// `AdminSession` is the capability to approve accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    username: String,
}

impl AdminSession {
    pub(crate) fn new(username: String) -> Self {
        Self { username }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
