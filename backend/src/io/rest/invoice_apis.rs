//! # REST API for Invoices

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use log::info;

use crate::io::rest::{error_response, require_shop};
use crate::AppState;

/// Create a router for invoice APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(generate_invoice))
}

/// Generate the shop's bill, save it, and return the PDF
pub async fn generate_invoice(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let shop = match require_shop(&state, &headers) {
        Ok(shop) => shop,
        Err(response) => return response,
    };
    info!("GET /api/invoice - shop: {}", shop.shop_name);

    match state.invoice_service.generate_invoice(&shop.shop_name) {
        Ok(invoice) => {
            let file_name = invoice
                .file_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "monthly_bill.pdf".to_string());
            // Header values must be visible ASCII.
            let file_name: String = file_name
                .chars()
                .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
                .collect();
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", file_name.replace('"', "_")),
                    ),
                ],
                invoice.pdf,
            )
                .into_response()
        }
        Err(e) => error_response("Failed to generate invoice", &e),
    }
}
