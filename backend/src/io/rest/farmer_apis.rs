//! # REST API for Farmers
//!
//! Farmers are always scoped to the shop of the session token.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;
use shared::AddFarmerRequest;

use crate::io::rest::mappers::farmer_mapper::FarmerMapper;
use crate::io::rest::{error_response, require_shop};
use crate::AppState;

/// Create a router for farmer APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_farmers).post(add_farmer))
}

/// List the shop's farmers
pub async fn list_farmers(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let shop = match require_shop(&state, &headers) {
        Ok(shop) => shop,
        Err(response) => return response,
    };
    info!("GET /api/farmers - shop: {}", shop.shop_name);

    match state.farmer_service.list_farmers(&shop.shop_name) {
        Ok(result) => (StatusCode::OK, Json(FarmerMapper::to_list_dto(result.farmers))).into_response(),
        Err(e) => error_response("Failed to list farmers", &e),
    }
}

/// Add a farmer to the shop
pub async fn add_farmer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AddFarmerRequest>,
) -> impl IntoResponse {
    let shop = match require_shop(&state, &headers) {
        Ok(shop) => shop,
        Err(response) => return response,
    };
    info!("POST /api/farmers - shop: {}, farmer: {}", shop.shop_name, request.farmer_id);

    let command = FarmerMapper::to_add_command(&shop.shop_name, request);
    match state.farmer_service.add_farmer(command) {
        Ok(farmer) => (StatusCode::CREATED, Json(FarmerMapper::to_dto(farmer))).into_response(),
        Err(e) => error_response("Failed to add farmer", &e),
    }
}
