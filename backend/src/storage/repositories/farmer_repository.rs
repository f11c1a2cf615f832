use anyhow::Result;
use log::info;

use crate::domain::errors::BillingError;
use crate::domain::models::Farmer;
use crate::storage::table::{Record, TableRepository, TableSchema};
use crate::storage::traits::FarmerStorage;

/// Repository for `farmers.csv`
pub type FarmerRepository = TableRepository<Farmer>;

impl Record for Farmer {
    const SCHEMA: TableSchema = TableSchema {
        name: "farmers",
        file_name: "farmers.csv",
        columns: &["ShopName", "FarmerID", "Name", "Village", "Phone"],
    };

    fn to_row(&self) -> Vec<String> {
        vec![
            self.shop_name.clone(),
            self.farmer_id.clone(),
            self.name.clone(),
            self.village.clone(),
            self.phone.clone(),
        ]
    }

    fn from_row(row: &[String]) -> std::result::Result<Self, String> {
        Ok(Farmer {
            shop_name: row[0].clone(),
            farmer_id: row[1].clone(),
            name: row[2].clone(),
            village: row[3].clone(),
            phone: row[4].clone(),
        })
    }
}

fn duplicate_farmer(farmer: &Farmer) -> BillingError {
    BillingError::validation(format!(
        "Farmer ID '{}' already exists for shop '{}'",
        farmer.farmer_id, farmer.shop_name
    ))
}

impl FarmerStorage for TableRepository<Farmer> {
    fn insert_farmer(&self, farmer: &Farmer) -> Result<()> {
        self.mutate(|table| {
            if table.rows().iter().any(|f| f.same_key(farmer)) {
                return Err(duplicate_farmer(farmer).into());
            }
            table.append(farmer.clone());
            Ok(())
        })?;
        info!("Stored farmer '{}' for shop '{}'", farmer.farmer_id, farmer.shop_name);
        Ok(())
    }

    fn insert_farmers(&self, farmers: Vec<Farmer>) -> Result<usize> {
        let count = farmers.len();
        self.mutate(|table| {
            for farmer in farmers {
                if table.rows().iter().any(|f| f.same_key(&farmer)) {
                    return Err(duplicate_farmer(&farmer).into());
                }
                table.append(farmer);
            }
            Ok(())
        })?;
        info!("Stored {} farmers", count);
        Ok(count)
    }

    fn get_farmer(&self, shop_name: &str, farmer_id: &str) -> Result<Option<Farmer>> {
        self.find(|f| f.belongs_to(shop_name) && f.farmer_id == farmer_id)
    }

    fn list_farmers(&self, shop_name: &str) -> Result<Vec<Farmer>> {
        self.filter(|f| f.belongs_to(shop_name))
    }
}
