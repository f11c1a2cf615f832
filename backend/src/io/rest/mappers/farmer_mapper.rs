use shared::{AddFarmerRequest, FarmerDto, FarmerListResponse};

use crate::domain::commands::farmers::AddFarmerCommand;
use crate::domain::models::Farmer;

/// Mapper to convert between farmer DTOs and domain farmers.
pub struct FarmerMapper;

impl FarmerMapper {
    /// Build the add command; the shop comes from the session, not the body.
    pub fn to_add_command(shop_name: &str, request: AddFarmerRequest) -> AddFarmerCommand {
        AddFarmerCommand {
            shop_name: shop_name.to_string(),
            farmer_id: request.farmer_id,
            name: request.name,
            village: request.village,
            phone: request.phone,
        }
    }

    pub fn to_dto(domain: Farmer) -> FarmerDto {
        FarmerDto {
            farmer_id: domain.farmer_id,
            name: domain.name,
            village: domain.village,
            phone: domain.phone,
        }
    }

    pub fn to_list_dto(farmers: Vec<Farmer>) -> FarmerListResponse {
        FarmerListResponse {
            farmers: farmers.into_iter().map(Self::to_dto).collect(),
        }
    }
}
