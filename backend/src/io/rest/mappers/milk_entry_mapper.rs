use anyhow::Result;
use chrono::NaiveDate;
use shared::{CreateMilkEntryRequest, MilkEntryDto, MilkEntryListResponse, MilkEntryResponse};

use crate::domain::commands::milk::{RecordMilkEntryCommand, RecordMilkEntryResult};
use crate::domain::errors::BillingError;
use crate::domain::models::{MilkEntry, Session};

/// Mapper to convert between milk entry DTOs and domain entries.
pub struct MilkEntryMapper;

impl MilkEntryMapper {
    /// Parse the request into a command for `shop_name`. Bad dates or
    /// sessions are validation errors.
    pub fn to_record_command(
        shop_name: &str,
        request: CreateMilkEntryRequest,
    ) -> Result<RecordMilkEntryCommand> {
        let date = match request.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
                BillingError::validation(format!("Date '{}' is not YYYY-MM-DD", text))
            })?),
        };
        let session = request.session.parse::<Session>()?;

        Ok(RecordMilkEntryCommand {
            shop_name: shop_name.to_string(),
            date,
            farmer_id: request.farmer_id,
            session,
            litres: request.litres,
            fat: request.fat,
            clr: request.clr,
        })
    }

    pub fn to_dto(domain: MilkEntry) -> MilkEntryDto {
        MilkEntryDto {
            date: domain.date.format("%Y-%m-%d").to_string(),
            farmer_id: domain.farmer_id,
            session: domain.session.to_string(),
            litres: domain.litres,
            fat: domain.fat,
            clr: domain.clr,
            rate: domain.rate,
            amount: domain.amount,
        }
    }

    pub fn to_record_response(result: RecordMilkEntryResult) -> MilkEntryResponse {
        MilkEntryResponse {
            entry: Self::to_dto(result.entry),
            rate_matched: result.rate_matched,
        }
    }

    pub fn to_list_dto(entries: Vec<MilkEntry>) -> MilkEntryListResponse {
        MilkEntryListResponse {
            entries: entries.into_iter().map(Self::to_dto).collect(),
        }
    }
}
