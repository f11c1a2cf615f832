//! # REST API for Milk Entries

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::{info, warn};
use shared::CreateMilkEntryRequest;

use crate::io::rest::mappers::milk_entry_mapper::MilkEntryMapper;
use crate::io::rest::{error_response, require_shop};
use crate::AppState;

/// Create a router for milk entry APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_entries).post(record_entry))
}

/// List the shop's entries in stored order
pub async fn list_entries(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let shop = match require_shop(&state, &headers) {
        Ok(shop) => shop,
        Err(response) => return response,
    };
    info!("GET /api/milk - shop: {}", shop.shop_name);

    match state.milk_collection_service.list_entries(&shop.shop_name) {
        Ok(result) => (StatusCode::OK, Json(MilkEntryMapper::to_list_dto(result.entries))).into_response(),
        Err(e) => error_response("Failed to list milk entries", &e),
    }
}

/// Record one collection
pub async fn record_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateMilkEntryRequest>,
) -> impl IntoResponse {
    let shop = match require_shop(&state, &headers) {
        Ok(shop) => shop,
        Err(response) => return response,
    };
    info!("POST /api/milk - shop: {}, request: {:?}", shop.shop_name, request);

    let command = match MilkEntryMapper::to_record_command(&shop.shop_name, request) {
        Ok(command) => command,
        Err(e) => return error_response("Invalid milk entry", &e),
    };

    match state.milk_collection_service.record_entry(command) {
        Ok(result) => {
            if !result.rate_matched {
                warn!("Entry saved without a matching rate for shop {}", shop.shop_name);
            }
            (StatusCode::CREATED, Json(MilkEntryMapper::to_record_response(result))).into_response()
        }
        Err(e) => error_response("Failed to record milk entry", &e),
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};
    use shared::{MilkEntryListResponse, MilkEntryResponse};

    #[tokio::test]
    async fn test_record_and_list_entries() {
        let app = setup_test_app();
        let token = login_shop(&app, "alice", "ShopA").await;
        add_farmer(&app, &token, "F1").await;
        assert_eq!(upload_rates(&app, &token, "Fat,CLR,Rate\n4.5,28,42.5\n").await, StatusCode::OK);

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/milk",
            Some(&token),
            json!({"date": "2024-03-01", "farmer_id": "F1", "session": "Morning",
                   "litres": 10.0, "fat": 4.5, "clr": 28.0}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: MilkEntryResponse = parse(body);
        assert!(created.rate_matched);
        assert_eq!(created.entry.amount, 425.0);

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/milk",
            Some(&token),
            json!({"date": "2024-03-01", "farmer_id": "F1", "session": "Evening",
                   "litres": 5.0, "fat": 3.0, "clr": 25.0}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: MilkEntryResponse = parse(body);
        assert!(!created.rate_matched);
        assert_eq!(created.entry.rate, 0.0);

        let (_, body) = send_json(&app, Method::GET, "/api/milk", Some(&token), Value::Null).await;
        let list: MilkEntryListResponse = parse(body);
        assert_eq!(list.entries.len(), 2);
        assert_eq!(list.entries[0].session, "Morning");
        assert_eq!(list.entries[1].date, "2024-03-01");
    }

    #[tokio::test]
    async fn test_record_entry_for_unknown_farmer_is_bad_request() {
        let app = setup_test_app();
        let token = login_shop(&app, "alice", "ShopA").await;

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/milk",
            Some(&token),
            json!({"farmer_id": "F9", "session": "Morning", "litres": 1.0, "fat": 4.5, "clr": 28.0}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("F9"));
    }

    #[tokio::test]
    async fn test_record_entry_with_bad_session_is_bad_request() {
        let app = setup_test_app();
        let token = login_shop(&app, "alice", "ShopA").await;
        add_farmer(&app, &token, "F1").await;

        let (status, _) = send_json(
            &app,
            Method::POST,
            "/api/milk",
            Some(&token),
            json!({"farmer_id": "F1", "session": "Noon", "litres": 1.0, "fat": 4.5, "clr": 28.0}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
