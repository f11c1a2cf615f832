//! Rate lookup against the rate chart.
//!
//! The lookup is an exact match on both keys; there is no rounding or nearest
//! neighbour. What to do on a miss is up to the caller.

use crate::domain::models::RateChartEntry;

/// Rate for the first chart row whose fat and clr equal the query exactly.
pub fn resolve_rate(chart: &[RateChartEntry], fat: f64, clr: f64) -> Option<f64> {
    chart.iter().find(|e| e.matches(fat, clr)).map(|e| e.rate)
}

/// Amount payable for a delivery, no rounding.
pub fn compute_amount(litres: f64, rate: f64) -> f64 {
    litres * rate
}

/// Rate and amount for a prospective delivery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateQuote {
    pub rate: Option<f64>,
    pub amount: f64,
}

impl RateQuote {
    /// Quote a delivery; a miss quotes a zero amount.
    pub fn for_delivery(chart: &[RateChartEntry], fat: f64, clr: f64, litres: f64) -> Self {
        let rate = resolve_rate(chart, fat, clr);
        Self {
            rate,
            amount: compute_amount(litres, rate.unwrap_or(0.0)),
        }
    }

    /// Rate to store on an entry; a miss is stored as zero.
    pub fn stored_rate(&self) -> f64 {
        self.rate.unwrap_or(0.0)
    }

    pub fn matched(&self) -> bool {
        self.rate.is_some()
    }
}
