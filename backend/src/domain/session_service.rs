//! Login sessions for the HTTP API.
//!
//! A successful login is exchanged for an opaque bearer token. Tokens live in
//! memory only and are gone when the process exits. Each user holds at most
//! one token: logging in again replaces the previous one.

use anyhow::{anyhow, Result};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::models::{Account, AdminSession};

/// Who a bearer token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPrincipal {
    Shop { username: String, shop_name: String },
    Admin(AdminSession),
}

impl SessionPrincipal {
    fn same_user(&self, other: &SessionPrincipal) -> bool {
        match (self, other) {
            (SessionPrincipal::Shop { username: a, .. }, SessionPrincipal::Shop { username: b, .. }) => {
                a == b
            }
            (SessionPrincipal::Admin(a), SessionPrincipal::Admin(b)) => a.username() == b.username(),
            _ => false,
        }
    }
}

/// In-memory token table
#[derive(Clone, Default)]
pub struct SessionService {
    sessions: Arc<Mutex<HashMap<String, SessionPrincipal>>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a shop session for an account that has just logged in
    pub fn start_shop_session(&self, account: &Account) -> Result<String> {
        self.start(SessionPrincipal::Shop {
            username: account.username.clone(),
            shop_name: account.shop_name.clone(),
        })
    }

    /// Open an admin session
    pub fn start_admin_session(&self, admin: AdminSession) -> Result<String> {
        self.start(SessionPrincipal::Admin(admin))
    }

    /// The principal behind a token, if the token is live
    pub fn resolve(&self, token: &str) -> Result<Option<SessionPrincipal>> {
        let sessions = self.lock()?;
        Ok(sessions.get(token).cloned())
    }

    /// Drop a token; returns whether it was live
    pub fn end(&self, token: &str) -> Result<bool> {
        let removed = self.lock()?.remove(token);
        if removed.is_some() {
            info!("Session ended");
        } else {
            debug!("Logout with unknown token");
        }
        Ok(removed.is_some())
    }

    fn start(&self, principal: SessionPrincipal) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        match &principal {
            SessionPrincipal::Shop { username, .. } => info!("Session started for '{}'", username),
            SessionPrincipal::Admin(admin) => {
                info!("Admin session started for '{}'", admin.username())
            }
        }
        let mut sessions = self.lock()?;
        let before = sessions.len();
        sessions.retain(|_, existing| !existing.same_user(&principal));
        if sessions.len() < before {
            debug!("Replaced an earlier session of the same user");
        }
        sessions.insert(token.clone(), principal);
        Ok(token)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, SessionPrincipal>>> {
        self.sessions
            .lock()
            .map_err(|_| anyhow!("Session table lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            username: "alice".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            shop_name: "ShopA".to_string(),
            approved: true,
        }
    }

    #[test]
    fn test_tokens_resolve_to_their_principal() {
        let service = SessionService::new();
        let shop_token = service.start_shop_session(&account()).unwrap();
        let admin_token = service
            .start_admin_session(AdminSession::new("admin".to_string()))
            .unwrap();

        assert_ne!(shop_token, admin_token);
        assert_eq!(
            service.resolve(&shop_token).unwrap(),
            Some(SessionPrincipal::Shop {
                username: "alice".to_string(),
                shop_name: "ShopA".to_string(),
            })
        );
        assert!(matches!(
            service.resolve(&admin_token).unwrap(),
            Some(SessionPrincipal::Admin(_))
        ));
        assert_eq!(service.resolve("not-a-token").unwrap(), None);
    }

    #[test]
    fn test_end_removes_token() {
        let service = SessionService::new();
        let token = service.start_shop_session(&account()).unwrap();
        let clone = service.clone();

        assert!(clone.end(&token).unwrap());
        assert!(!service.end(&token).unwrap());
        assert_eq!(service.resolve(&token).unwrap(), None);
    }

    #[test]
    fn test_login_again_replaces_previous_token() {
        let service = SessionService::new();
        let first = service.start_shop_session(&account()).unwrap();
        let mut bob = account();
        bob.username = "bob".to_string();
        let other = service.start_shop_session(&bob).unwrap();
        let admin = service
            .start_admin_session(AdminSession::new("admin".to_string()))
            .unwrap();

        let second = service.start_shop_session(&account()).unwrap();

        assert_eq!(service.resolve(&first).unwrap(), None);
        assert!(service.resolve(&second).unwrap().is_some());
        assert!(service.resolve(&other).unwrap().is_some());
        assert!(service.resolve(&admin).unwrap().is_some());
        assert_eq!(service.lock().unwrap().len(), 3);
    }
}
