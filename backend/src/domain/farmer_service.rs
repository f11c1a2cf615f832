use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::farmers::{AddFarmerCommand, ListFarmersResult};
use crate::domain::errors::BillingError;
use crate::domain::models::Farmer;
use crate::storage::traits::FarmerStorage;

/// Service for managing the farmers of a shop
#[derive(Clone)]
pub struct FarmerService {
    farmer_repository: Arc<dyn FarmerStorage>,
}

impl FarmerService {
    /// Create a new FarmerService
    pub fn new(farmer_repository: Arc<dyn FarmerStorage>) -> Self {
        Self { farmer_repository }
    }

    /// Add a farmer to a shop
    pub fn add_farmer(&self, command: AddFarmerCommand) -> Result<Farmer> {
        info!(
            "Adding farmer '{}' to shop '{}'",
            command.farmer_id, command.shop_name
        );

        let farmer = Farmer {
            shop_name: command.shop_name,
            farmer_id: command.farmer_id.trim().to_string(),
            name: command.name.trim().to_string(),
            village: command.village.trim().to_string(),
            phone: command.phone.trim().to_string(),
        };

        if farmer.farmer_id.is_empty() || farmer.name.is_empty() {
            warn!("Rejected farmer without ID or name for shop '{}'", farmer.shop_name);
            return Err(BillingError::validation("Farmer ID and Name are required").into());
        }

        self.farmer_repository.insert_farmer(&farmer)?;
        info!("Added farmer '{}' ({})", farmer.farmer_id, farmer.name);
        Ok(farmer)
    }

    /// Farmers of a shop, in the order they were added
    pub fn list_farmers(&self, shop_name: &str) -> Result<ListFarmersResult> {
        let farmers = self.farmer_repository.list_farmers(shop_name)?;
        info!("Found {} farmers for shop '{}'", farmers.len(), shop_name);
        Ok(ListFarmersResult { farmers })
    }

    /// Look up one farmer of a shop
    pub fn get_farmer(&self, shop_name: &str, farmer_id: &str) -> Result<Option<Farmer>> {
        self.farmer_repository.get_farmer(shop_name, farmer_id.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FarmerRepository, MemoryConnection, RecordStore};

    fn setup_test() -> FarmerService {
        let store = RecordStore::new(Arc::new(MemoryConnection::new()));
        FarmerService::new(Arc::new(FarmerRepository::open(store).unwrap()))
    }

    fn add(shop: &str, id: &str, name: &str) -> AddFarmerCommand {
        AddFarmerCommand {
            shop_name: shop.to_string(),
            farmer_id: id.to_string(),
            name: name.to_string(),
            village: " Anand ".to_string(),
            phone: String::new(),
        }
    }

    #[test]
    fn test_add_and_list_farmers_per_shop() {
        let service = setup_test();
        service.add_farmer(add("ShopA", "F1", "Ravi")).unwrap();
        service.add_farmer(add("ShopB", "F9", "Meena")).unwrap();
        service.add_farmer(add("ShopA", " F2 ", "Kiran")).unwrap();

        let ids: Vec<String> = service
            .list_farmers("ShopA")
            .unwrap()
            .farmers
            .into_iter()
            .map(|f| f.farmer_id)
            .collect();
        assert_eq!(ids, vec!["F1", "F2"]);

        let farmer = service.get_farmer("ShopA", "F2").unwrap().unwrap();
        assert_eq!(farmer.village, "Anand");
        assert!(service.get_farmer("ShopB", "F1").unwrap().is_none());
    }

    #[test]
    fn test_farmer_id_and_name_are_required() {
        let service = setup_test();
        for cmd in [add("ShopA", "", "Ravi"), add("ShopA", "F1", "  ")] {
            let err = service.add_farmer(cmd).unwrap_err();
            assert!(matches!(
                BillingError::classify(&err),
                Some(BillingError::Validation(_))
            ));
        }
        assert!(service.list_farmers("ShopA").unwrap().farmers.is_empty());
    }

    #[test]
    fn test_duplicate_farmer_id_in_same_shop_is_rejected() {
        let service = setup_test();
        service.add_farmer(add("ShopA", "F1", "Ravi")).unwrap();
        let err = service.add_farmer(add("ShopA", "F1", "Other")).unwrap_err();
        assert!(matches!(
            BillingError::classify(&err),
            Some(BillingError::Validation(_))
        ));
        service.add_farmer(add("ShopB", "F1", "Other")).unwrap();
    }
}
