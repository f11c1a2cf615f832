use shared::{AccountDto, PendingAccountsResponse};

use crate::domain::models::Account;

/// Mapper from domain accounts to the admin-facing DTO. The password hash
/// stays behind.
pub struct AccountMapper;

impl AccountMapper {
    pub fn to_dto(domain: Account) -> AccountDto {
        AccountDto {
            username: domain.username,
            shop_name: domain.shop_name,
            approved: domain.approved,
        }
    }

    pub fn to_pending_list_dto(accounts: Vec<Account>) -> PendingAccountsResponse {
        PendingAccountsResponse {
            accounts: accounts.into_iter().map(Self::to_dto).collect(),
        }
    }
}
