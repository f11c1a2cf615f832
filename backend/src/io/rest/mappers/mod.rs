//! Conversions between the `shared` DTOs and domain models.

pub mod account_mapper;
pub mod farmer_mapper;
pub mod milk_entry_mapper;
pub mod rate_chart_mapper;
