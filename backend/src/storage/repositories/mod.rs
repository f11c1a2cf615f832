//! Table repositories for the four billing tables.
//!
//! Each module defines the table's schema and row codec (`Record`) and
//! implements the matching entity storage trait on `TableRepository`.

pub mod account_repository;
pub mod farmer_repository;
pub mod milk_entry_repository;
pub mod rate_chart_repository;

pub use account_repository::AccountRepository;
pub use farmer_repository::FarmerRepository;
pub use milk_entry_repository::MilkEntryRepository;
pub use rate_chart_repository::RateChartRepository;

/// Parse a numeric cell, naming the column in the error.
pub(crate) fn parse_decimal(cell: &str, column: &str) -> Result<f64, String> {
    let value = cell
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("{} is not a number: '{}'", column, cell))?;
    if !value.is_finite() {
        return Err(format!("{} must be finite: '{}'", column, cell));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(" 4.5 ", "Fat"), Ok(4.5));
        assert_eq!(parse_decimal("10", "Litres"), Ok(10.0));
        assert!(parse_decimal("abc", "Fat").unwrap_err().contains("Fat"));
        assert!(parse_decimal("NaN", "Rate").is_err());
        assert!(parse_decimal("", "CLR").is_err());
    }
}
