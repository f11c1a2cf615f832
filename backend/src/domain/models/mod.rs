//! Domain models for the dairy billing system.
//!
//! These are the core types the services work with. Storage and the REST layer
//! convert to and from them; neither CSV rows nor JSON DTOs leak into the
//! domain.

pub mod account;
pub mod farmer;
pub mod milk_entry;
pub mod rate_chart;
pub mod tabular;

pub use account::{Account, AdminSession};
pub use farmer::Farmer;
pub use milk_entry::{MilkEntry, Session};
pub use rate_chart::RateChartEntry;
pub use tabular::{ImportFormat, TabularData};

/// Render a number the way the billing files have always shown it:
/// whole values keep one decimal (`10.0`), everything else uses the shortest
/// representation that parses back to the same value.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
