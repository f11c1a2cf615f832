use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::BillingError;

/// Time of day a collection happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Session {
    Morning,
    Evening,
}

impl Session {
    pub fn as_str(&self) -> &'static str {
        match self {
            Session::Morning => "Morning",
            Session::Evening => "Evening",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Session {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(Session::Morning),
            "evening" => Ok(Session::Evening),
            other => Err(BillingError::validation(format!(
                "Session must be Morning or Evening, got '{}'",
                other
            ))),
        }
    }
}

/// One milk collection event.
///
/// `rate` and `amount` are frozen when the entry is created, so later rate
/// chart uploads never change past invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkEntry {
    pub shop_name: String,
    pub date: NaiveDate,
    pub farmer_id: String,
    pub session: Session,
    pub litres: f64,
    pub fat: f64,
    pub clr: f64,
    pub rate: f64,
    pub amount: f64,
}

impl MilkEntry {
    pub fn belongs_to(&self, shop_name: &str) -> bool {
        self.shop_name == shop_name
    }
}
