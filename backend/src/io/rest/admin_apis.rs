//! # REST API for Account Approval
//!
//! Admin login, the pending list and approval. Everything except login needs
//! an admin token.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;
use shared::{AdminLoginResponse, LoginRequest};

use crate::domain::commands::accounts::LoginCommand;
use crate::io::rest::mappers::account_mapper::AccountMapper;
use crate::io::rest::{error_response, require_admin};
use crate::AppState;

/// Create a router for admin APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin_login))
        .route("/pending", get(list_pending))
        .route("/approve/:username", post(approve))
}

/// Check the admin credentials and open an admin session
pub async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/admin/login - username: {}", request.username);

    let command = LoginCommand {
        username: request.username,
        password: request.password,
    };

    let admin = match state.account_service.admin_login(command) {
        Ok(admin) => admin,
        Err(e) => return error_response("Admin login failed", &e),
    };

    match state.session_service.start_admin_session(admin) {
        Ok(token) => (StatusCode::OK, Json(AdminLoginResponse { token })).into_response(),
        Err(e) => error_response("Failed to start session", &e),
    }
}

/// Accounts waiting for approval
pub async fn list_pending(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/admin/pending");

    let admin = match require_admin(&state, &headers) {
        Ok(admin) => admin,
        Err(response) => return response,
    };

    match state.account_service.list_pending(&admin) {
        Ok(accounts) => {
            (StatusCode::OK, Json(AccountMapper::to_pending_list_dto(accounts))).into_response()
        }
        Err(e) => error_response("Failed to list pending accounts", &e),
    }
}

/// Approve one account
pub async fn approve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/admin/approve/{}", username);

    let admin = match require_admin(&state, &headers) {
        Ok(admin) => admin,
        Err(response) => return response,
    };

    match state.account_service.approve(&admin, &username) {
        Ok(account) => (StatusCode::OK, Json(AccountMapper::to_dto(account))).into_response(),
        Err(e) => error_response("Failed to approve account", &e),
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};
    use shared::{AccountDto, PendingAccountsResponse};

    #[tokio::test]
    async fn test_admin_login_with_wrong_password() {
        let app = setup_test_app();
        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/admin/login",
            None,
            json!({"username": "admin", "password": "guess"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_pending_list_and_approval() {
        let app = setup_test_app();
        for (user, shop) in [("alice", "ShopA"), ("bob", "ShopB")] {
            send_json(
                &app,
                Method::POST,
                "/api/accounts/register",
                None,
                json!({"username": user, "password": "pw", "shop_name": shop}),
            )
            .await;
        }
        let admin = login_admin(&app).await;

        let (status, body) = send_json(&app, Method::GET, "/api/admin/pending", Some(&admin), Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        let pending: PendingAccountsResponse = parse(body);
        assert_eq!(pending.accounts.len(), 2);

        let (status, body) = send_json(&app, Method::POST, "/api/admin/approve/alice", Some(&admin), Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        let account: AccountDto = parse(body);
        assert!(account.approved);

        let (_, body) = send_json(&app, Method::GET, "/api/admin/pending", Some(&admin), Value::Null).await;
        let pending: PendingAccountsResponse = parse(body);
        assert_eq!(pending.accounts.len(), 1);
        assert_eq!(pending.accounts[0].username, "bob");
    }

    #[tokio::test]
    async fn test_approve_unknown_account_is_not_found() {
        let app = setup_test_app();
        let admin = login_admin(&app).await;
        let (status, _) = send_json(&app, Method::POST, "/api/admin/approve/ghost", Some(&admin), Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_endpoints_need_admin_token() {
        let app = setup_test_app();
        let (status, _) = send_json(&app, Method::GET, "/api/admin/pending", None, Value::Null).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let shop_token = login_shop(&app, "alice", "ShopA").await;
        let (status, _) = send_json(&app, Method::GET, "/api/admin/pending", Some(&shop_token), Value::Null).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
