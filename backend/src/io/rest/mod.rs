//! # REST API Interface Layer
//!
//! HTTP endpoints for the billing service, all nested under `/api`.
//! This layer handles:
//! - JSON request/response serialization
//! - Bearer token checks for shop and admin endpoints
//! - Translating domain errors to HTTP status codes
//!
//! Handlers hold no business rules; they map DTOs to commands, call a
//! domain service and map the result back.

pub mod account_apis;
pub mod admin_apis;
pub mod farmer_apis;
pub mod import_apis;
pub mod invoice_apis;
pub mod mappers;
pub mod milk_apis;
pub mod rate_chart_apis;

use anyhow::Context;
use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    Router,
};
use log::{error, warn};
use serde::Deserialize;
use shared::ErrorResponse;

use crate::domain::errors::BillingError;
use crate::domain::models::{AdminSession, ImportFormat};
use crate::domain::SessionPrincipal;
use crate::AppState;

/// All API routes, to be nested under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/accounts", account_apis::router())
        .nest("/admin", admin_apis::router())
        .nest("/farmers", farmer_apis::router())
        .nest("/milk", milk_apis::router())
        .nest("/import", import_apis::router())
        .nest("/rates", rate_chart_apis::router())
        .nest("/invoice", invoice_apis::router())
}

/// The shop a request acts for
#[derive(Debug, Clone)]
pub struct ShopContext {
    pub username: String,
    pub shop_name: String,
}

/// `?format=csv|xlsx` on upload endpoints
#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>,
}

impl FormatQuery {
    /// CSV unless another format is named
    pub fn import_format(&self) -> anyhow::Result<ImportFormat> {
        match &self.format {
            Some(format) => Ok(format.parse::<ImportFormat>()?),
            None => Ok(ImportFormat::Csv),
        }
    }
}

pub(crate) fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Translate a service error into a response. Unclassified errors are logged
/// in full and reported with `context` only.
pub(crate) fn error_response(context: &str, err: &anyhow::Error) -> Response {
    let status = match BillingError::classify(err) {
        Some(BillingError::Validation(_)) | Some(BillingError::UnrecognizedImportFormat(_)) => {
            StatusCode::BAD_REQUEST
        }
        Some(BillingError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
        Some(BillingError::AccountNotFound(_)) | Some(BillingError::NoMilkData(_)) => {
            StatusCode::NOT_FOUND
        }
        Some(BillingError::DuplicateUsername(_)) => StatusCode::CONFLICT,
        None => {
            error!("{}: {:?}", context, err);
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, context);
        }
    };
    warn!("{}: {}", context, err);
    error_body(status, err.to_string())
}

/// Run a CPU-heavy service call (password hashing) off the async workers
pub(crate) async fn run_blocking<T, F>(job: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .context("Blocking task failed")?
}

/// Token from an `Authorization: Bearer <token>` header
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn resolve_principal(state: &AppState, headers: &HeaderMap) -> Result<SessionPrincipal, Response> {
    let Some(token) = bearer_token(headers) else {
        return Err(error_body(StatusCode::UNAUTHORIZED, "Missing session token"));
    };
    match state.session_service.resolve(token) {
        Ok(Some(principal)) => Ok(principal),
        Ok(None) => Err(error_body(StatusCode::UNAUTHORIZED, "Invalid or expired session token")),
        Err(e) => Err(error_response("Failed to check session", &e)),
    }
}

/// The shop behind the request's token
pub(crate) fn require_shop(state: &AppState, headers: &HeaderMap) -> Result<ShopContext, Response> {
    match resolve_principal(state, headers)? {
        SessionPrincipal::Shop {
            username,
            shop_name,
        } => Ok(ShopContext {
            username,
            shop_name,
        }),
        SessionPrincipal::Admin(_) => Err(error_body(
            StatusCode::FORBIDDEN,
            "This endpoint needs a shop login",
        )),
    }
}

/// The admin capability behind the request's token
pub(crate) fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<AdminSession, Response> {
    match resolve_principal(state, headers)? {
        SessionPrincipal::Admin(admin) => Ok(admin),
        SessionPrincipal::Shop { .. } => Err(error_body(
            StatusCode::FORBIDDEN,
            "This endpoint needs an admin login",
        )),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc-123"));
        assert_eq!(bearer_token(&headers), Some("abc-123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (BillingError::validation("x"), StatusCode::BAD_REQUEST),
            (BillingError::UnrecognizedImportFormat("x".into()), StatusCode::BAD_REQUEST),
            (BillingError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (BillingError::AccountNotFound("x".into()), StatusCode::NOT_FOUND),
            (BillingError::NoMilkData("x".into()), StatusCode::NOT_FOUND),
            (BillingError::DuplicateUsername("x".into()), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            let response = error_response("ctx", &anyhow::Error::from(err));
            assert_eq!(response.status(), status);
        }

        let response = error_response("ctx", &anyhow::anyhow!("disk on fire"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_run_blocking_passes_results_through() {
        assert_eq!(run_blocking(|| Ok(7)).await.unwrap(), 7);

        let err = run_blocking(|| -> anyhow::Result<()> { Err(BillingError::InvalidCredentials.into()) })
            .await
            .unwrap_err();
        assert!(matches!(BillingError::classify(&err), Some(BillingError::InvalidCredentials)));
    }

    #[test]
    fn test_format_query_defaults_to_csv() {
        let query = FormatQuery { format: None };
        assert_eq!(query.import_format().unwrap(), ImportFormat::Csv);
        let query = FormatQuery { format: Some("xlsx".to_string()) };
        assert_eq!(query.import_format().unwrap(), ImportFormat::Xlsx);
        let query = FormatQuery { format: Some("pdf".to_string()) };
        assert!(query.import_format().is_err());
    }
}
