//! # REST API for Data Import
//!
//! The request body is the raw file; `?format=xlsx` selects the spreadsheet
//! reader, CSV otherwise.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use log::info;
use shared::ImportResponse;

use crate::io::rest::{error_response, require_shop, FormatQuery};
use crate::io::tabular::parse_tabular;
use crate::AppState;

/// Create a router for import APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(import_file))
}

/// Import farmers or milk entries into the session's shop
pub async fn import_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<FormatQuery>,
    body: Bytes,
) -> impl IntoResponse {
    let shop = match require_shop(&state, &headers) {
        Ok(shop) => shop,
        Err(response) => return response,
    };
    info!(
        "POST /api/import - shop: {} ({} bytes, format {:?})",
        shop.shop_name,
        body.len(),
        query.format
    );

    let result = query
        .import_format()
        .and_then(|format| parse_tabular(format, &body))
        .and_then(|data| state.import_service.import(&shop.shop_name, &data));

    match result {
        Ok(result) => {
            let response = ImportResponse {
                kind: result.kind.to_string(),
                imported: result.imported,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Import failed", &e),
    }
}
