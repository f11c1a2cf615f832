//! # REST API for the Rate Chart
//!
//! The chart is shared by every shop; any logged-in shopkeeper can read,
//! replace or query it.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;
use serde::Deserialize;

use crate::io::rest::mappers::rate_chart_mapper::RateChartMapper;
use crate::io::rest::{error_response, require_shop, FormatQuery};
use crate::io::tabular::parse_tabular;
use crate::AppState;

/// Create a router for rate chart APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_rate_chart).put(upload_rate_chart))
        .route("/quote", get(quote))
}

/// Query parameters for the quote endpoint
#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub fat: f64,
    pub clr: f64,
    #[serde(default)]
    pub litres: f64,
}

/// The current chart
pub async fn get_rate_chart(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Err(response) = require_shop(&state, &headers) {
        return response;
    }
    info!("GET /api/rates");

    match state.rate_chart_service.rate_chart() {
        Ok(entries) => (StatusCode::OK, Json(RateChartMapper::to_chart_dto(entries))).into_response(),
        Err(e) => error_response("Failed to load rate chart", &e),
    }
}

/// Replace the chart with an uploaded CSV or XLSX file (raw request body)
pub async fn upload_rate_chart(
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
        "PUT /api/rates - by {} ({} bytes, format {:?})",
        shop.username,
        body.len(),
        query.format
    );

    let result = query
        .import_format()
        .and_then(|format| parse_tabular(format, &body))
        .and_then(|data| state.rate_chart_service.upload_rate_chart(&data));

    match result {
        Ok(entries) => (StatusCode::OK, Json(RateChartMapper::to_chart_dto(entries))).into_response(),
        Err(e) => error_response("Failed to upload rate chart", &e),
    }
}

/// Price a delivery without saving it
pub async fn quote(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<QuoteQuery>,
) -> impl IntoResponse {
    if let Err(response) = require_shop(&state, &headers) {
        return response;
    }
    info!("GET /api/rates/quote - {:?}", query);

    match state
        .milk_collection_service
        .quote(query.fat, query.clr, query.litres)
    {
        Ok(quote) => (StatusCode::OK, Json(RateChartMapper::to_quote_dto(quote))).into_response(),
        Err(e) => error_response("Failed to quote rate", &e),
    }
}
