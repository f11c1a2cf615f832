use shared::{RateChartEntryDto, RateChartResponse, RateQuoteResponse};

use crate::domain::models::RateChartEntry;
use crate::domain::rate_resolver::RateQuote;

/// Mapper from rate chart rows and quotes to DTOs.
pub struct RateChartMapper;

impl RateChartMapper {
    pub fn to_dto(domain: RateChartEntry) -> RateChartEntryDto {
        RateChartEntryDto {
            fat: domain.fat,
            clr: domain.clr,
            rate: domain.rate,
        }
    }

    pub fn to_chart_dto(entries: Vec<RateChartEntry>) -> RateChartResponse {
        RateChartResponse {
            entries: entries.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_quote_dto(quote: RateQuote) -> RateQuoteResponse {
        RateQuoteResponse {
            rate: quote.rate,
            amount: quote.amount,
        }
    }
}
