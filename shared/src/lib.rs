//! Request and response types for the dairy billing HTTP API.
//!
//! These are the wire format only; the backend maps them to and from its
//! domain models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub shop_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Returned by a successful shopkeeper login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
    pub shop_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    pub token: String,
}

/// An account as the admin sees it. The password hash is never sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDto {
    pub username: String,
    pub shop_name: String,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAccountsResponse {
    pub accounts: Vec<AccountDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddFarmerRequest {
    pub farmer_id: String,
    pub name: String,
    #[serde(default)]
    pub village: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerDto {
    pub farmer_id: String,
    pub name: String,
    pub village: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerListResponse {
    pub farmers: Vec<FarmerDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMilkEntryRequest {
    /// Collection date as YYYY-MM-DD; today if not provided
    #[serde(default)]
    pub date: Option<String>,
    pub farmer_id: String,
    /// "Morning" or "Evening"
    pub session: String,
    pub litres: f64,
    pub fat: f64,
    pub clr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkEntryDto {
    /// YYYY-MM-DD
    pub date: String,
    pub farmer_id: String,
    pub session: String,
    pub litres: f64,
    pub fat: f64,
    pub clr: f64,
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkEntryResponse {
    pub entry: MilkEntryDto,
    /// False when the (fat, clr) pair had no rate and the entry was saved at zero
    pub rate_matched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkEntryListResponse {
    pub entries: Vec<MilkEntryDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateChartEntryDto {
    pub fat: f64,
    pub clr: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateChartResponse {
    pub entries: Vec<RateChartEntryDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuoteResponse {
    /// `None` when the chart has no row for the pair
    pub rate: Option<f64>,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResponse {
    /// "farmers" or "milk_entries"
    pub kind: String,
    pub imported: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
