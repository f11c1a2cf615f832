use serde::{Deserialize, Serialize};

/// One row of the rate chart: the price per litre for an exact (fat, clr) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateChartEntry {
    pub fat: f64,
    pub clr: f64,
    pub rate: f64,
}

impl RateChartEntry {
    /// Exact floating point match on both keys, no tolerance.
    #[allow(clippy::float_cmp)]
    pub fn matches(&self, fat: f64, clr: f64) -> bool {
        self.fat == fat && self.clr == clr
    }
}
