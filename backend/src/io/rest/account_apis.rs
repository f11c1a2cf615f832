//! # REST API for Shopkeeper Accounts
//!
//! Registration, login and logout.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use log::info;
use shared::{LoginRequest, LoginResponse, RegisterRequest};

use crate::domain::commands::accounts::{LoginCommand, RegisterAccountCommand};
use crate::io::rest::mappers::account_mapper::AccountMapper;
use crate::io::rest::{bearer_token, error_body, error_response, run_blocking};
use crate::AppState;

/// Create a router for account related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Register a shopkeeper; the account waits for admin approval
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> impl IntoResponse {
    info!("POST /api/accounts/register - username: {}", request.username);

    let command = RegisterAccountCommand {
        username: request.username,
        password: request.password,
        shop_name: request.shop_name,
    };

    let service = state.account_service.clone();
    match run_blocking(move || service.register(command)).await {
        Ok(account) => (StatusCode::CREATED, Json(AccountMapper::to_dto(account))).into_response(),
        Err(e) => error_response("Failed to register account", &e),
    }
}

/// Log in a shopkeeper and open a session
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/accounts/login - username: {}", request.username);

    let command = LoginCommand {
        username: request.username,
        password: request.password,
    };

    let service = state.account_service.clone();
    let account = match run_blocking(move || service.login(command)).await {
        Ok(account) => account,
        Err(e) => return error_response("Login failed", &e),
    };

    match state.session_service.start_shop_session(&account) {
        Ok(token) => {
            let response = LoginResponse {
                token,
                shop_name: account.shop_name,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to start session", &e),
    }
}

/// End the session behind the bearer token
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("POST /api/accounts/logout");

    let Some(token) = bearer_token(&headers) else {
        return error_body(StatusCode::UNAUTHORIZED, "Missing session token");
    };

    match state.session_service.end(token) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_body(StatusCode::UNAUTHORIZED, "Invalid or expired session token"),
        Err(e) => error_response("Failed to end session", &e),
    }
}
