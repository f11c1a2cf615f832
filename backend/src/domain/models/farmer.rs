use serde::{Deserialize, Serialize};

/// A farmer delivering milk to one shop.
///
/// `farmer_id` is only unique within `shop_name`; two shops may both have a
/// farmer "F1".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farmer {
    pub shop_name: String,
    pub farmer_id: String,
    pub name: String,
    pub village: String,
    pub phone: String,
}

impl Farmer {
    pub fn belongs_to(&self, shop_name: &str) -> bool {
        self.shop_name == shop_name
    }

    /// Same shop and same farmer ID.
    pub fn same_key(&self, other: &Farmer) -> bool {
        self.shop_name == other.shop_name && self.farmer_id == other.farmer_id
    }
}
