use anyhow::Result;
use chrono::Local;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::milk::{
    ListMilkEntriesResult, RecordMilkEntryCommand, RecordMilkEntryResult,
};
use crate::domain::errors::BillingError;
use crate::domain::models::MilkEntry;
use crate::domain::rate_resolver::RateQuote;
use crate::storage::traits::{FarmerStorage, MilkEntryStorage, RateChartStorage};

/// Service for recording milk collections and pricing them from the rate chart
#[derive(Clone)]
pub struct MilkCollectionService {
    milk_repository: Arc<dyn MilkEntryStorage>,
    farmer_repository: Arc<dyn FarmerStorage>,
    rate_chart_repository: Arc<dyn RateChartStorage>,
}

impl MilkCollectionService {
    /// Create a new MilkCollectionService
    pub fn new(
        milk_repository: Arc<dyn MilkEntryStorage>,
        farmer_repository: Arc<dyn FarmerStorage>,
        rate_chart_repository: Arc<dyn RateChartStorage>,
    ) -> Self {
        Self {
            milk_repository,
            farmer_repository,
            rate_chart_repository,
        }
    }

    /// Record one collection. The rate is looked up now and frozen on the
    /// entry; a (fat, clr) pair missing from the chart is saved at rate zero.
    pub fn record_entry(&self, command: RecordMilkEntryCommand) -> Result<RecordMilkEntryResult> {
        let farmer_id = command.farmer_id.trim().to_string();
        info!(
            "Recording {} milk for farmer '{}' at shop '{}'",
            command.session, farmer_id, command.shop_name
        );

        check_measure("Litres", command.litres).map_err(BillingError::Validation)?;
        check_measure("Fat", command.fat).map_err(BillingError::Validation)?;
        check_measure("CLR", command.clr).map_err(BillingError::Validation)?;

        if farmer_id.is_empty() {
            return Err(BillingError::validation("Farmer ID is required").into());
        }
        if self
            .farmer_repository
            .get_farmer(&command.shop_name, &farmer_id)?
            .is_none()
        {
            warn!(
                "Farmer '{}' is not registered with shop '{}'",
                farmer_id, command.shop_name
            );
            return Err(BillingError::validation(format!(
                "Farmer '{}' is not registered with this shop",
                farmer_id
            ))
            .into());
        }

        let quote = self.quote(command.fat, command.clr, command.litres)?;
        if !quote.matched() {
            warn!(
                "No rate for fat {} / clr {}, saving entry with rate 0",
                command.fat, command.clr
            );
        }
        check_amount(quote.amount).map_err(BillingError::Validation)?;

        let entry = MilkEntry {
            shop_name: command.shop_name,
            date: command.date.unwrap_or_else(|| Local::now().date_naive()),
            farmer_id,
            session: command.session,
            litres: command.litres,
            fat: command.fat,
            clr: command.clr,
            rate: quote.stored_rate(),
            amount: quote.amount,
        };
        self.milk_repository.append_entry(&entry)?;

        info!(
            "Recorded entry for farmer '{}': rate {} amount {}",
            entry.farmer_id, entry.rate, entry.amount
        );
        Ok(RecordMilkEntryResult {
            entry,
            rate_matched: quote.matched(),
        })
    }

    /// Entries of a shop in stored order
    pub fn list_entries(&self, shop_name: &str) -> Result<ListMilkEntriesResult> {
        let entries = self.milk_repository.list_entries(shop_name)?;
        info!("Found {} milk entries for shop '{}'", entries.len(), shop_name);
        Ok(ListMilkEntriesResult { entries })
    }

    /// Price a delivery against the current chart without saving anything
    pub fn quote(&self, fat: f64, clr: f64, litres: f64) -> Result<RateQuote> {
        let chart = self.rate_chart_repository.load_chart()?;
        Ok(RateQuote::for_delivery(&chart, fat, clr, litres))
    }
}

pub(crate) fn check_measure(name: &str, value: f64) -> std::result::Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{} must be a non-negative number", name));
    }
    Ok(())
}

/// An amount must survive a write and reload of the milk table.
pub(crate) fn check_amount(amount: f64) -> std::result::Result<(), String> {
    if !amount.is_finite() {
        return Err("Amount is too large to store".to_string());
    }
    Ok(())
}
