use anyhow::Result;
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::commands::imports::{ImportKind, ImportResult};
use crate::domain::errors::BillingError;
use crate::domain::milk_collection_service::{check_amount, check_measure};
use crate::domain::models::{Farmer, MilkEntry, Session, TabularData};
use crate::domain::rate_chart_service::number_cell;
use crate::domain::rate_resolver::{compute_amount, resolve_rate};
use crate::storage::traits::{FarmerStorage, MilkEntryStorage, RateChartStorage};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Service for bulk imports of farmers or milk entries into a shop
#[derive(Clone)]
pub struct ImportService {
    farmer_repository: Arc<dyn FarmerStorage>,
    milk_repository: Arc<dyn MilkEntryStorage>,
    rate_chart_repository: Arc<dyn RateChartStorage>,
}

impl ImportService {
    /// Create a new ImportService
    pub fn new(
        farmer_repository: Arc<dyn FarmerStorage>,
        milk_repository: Arc<dyn MilkEntryStorage>,
        rate_chart_repository: Arc<dyn RateChartStorage>,
    ) -> Self {
        Self {
            farmer_repository,
            milk_repository,
            rate_chart_repository,
        }
    }

    /// Import a table into a shop.
    ///
    /// A `Litres` column means milk entries; otherwise a `FarmerID` column
    /// means farmers. Nothing is stored unless every row is valid.
    pub fn import(&self, shop_name: &str, data: &TabularData) -> Result<ImportResult> {
        info!(
            "Importing {} rows into shop '{}' with columns {:?}",
            data.len(),
            shop_name,
            data.headers
        );

        let kind = detect_kind(data)?;
        let imported = match kind {
            ImportKind::Farmers => {
                let farmers = parse_farmers(shop_name, data)?;
                self.farmer_repository.insert_farmers(farmers)?
            }
            ImportKind::MilkEntries => {
                let chart = self.rate_chart_repository.load_chart()?;
                let entries = parse_milk_entries(shop_name, data, |fat, clr| {
                    resolve_rate(&chart, fat, clr)
                })?;
                self.milk_repository.append_entries(entries)?
            }
        };

        info!("Imported {} {} into shop '{}'", imported, kind, shop_name);
        Ok(ImportResult { kind, imported })
    }
}

/// Decide what an uploaded table holds. Milk sheets carry `FarmerID` too, so
/// `Litres` decides.
fn detect_kind(data: &TabularData) -> Result<ImportKind> {
    if data.has_column("Litres") {
        Ok(ImportKind::MilkEntries)
    } else if data.has_column("FarmerID") {
        Ok(ImportKind::Farmers)
    } else {
        warn!("Import rejected, columns {:?}", data.headers);
        Err(BillingError::UnrecognizedImportFormat(
            "expected a FarmerID column (farmers) or a Litres column (milk entries)".to_string(),
        )
        .into())
    }
}

fn data_rows(data: &TabularData) -> impl Iterator<Item = (usize, &Vec<String>)> {
    data.rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.iter().all(|c| c.trim().is_empty()))
        .map(|(index, row)| (index + 2, row))
}

fn required_text<'a>(data: &'a TabularData, row: &'a [String], column: &str, line: usize) -> Result<&'a str> {
    match data.cell(row, column) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(BillingError::validation(format!("Row {}: {} is required", line, column)).into()),
    }
}

fn row_error(line: usize, reason: String) -> BillingError {
    BillingError::validation(format!("Row {}: {}", line, reason))
}

fn optional_text(data: &TabularData, row: &[String], column: &str) -> String {
    data.cell(row, column).unwrap_or("").to_string()
}

fn parse_farmers(shop_name: &str, data: &TabularData) -> Result<Vec<Farmer>> {
    let mut seen = HashSet::new();
    let mut farmers = Vec::new();
    for (line, row) in data_rows(data) {
        let farmer_id = required_text(data, row, "FarmerID", line)?.to_string();
        if !seen.insert(farmer_id.clone()) {
            return Err(BillingError::validation(format!(
                "Row {}: Farmer ID '{}' appears more than once",
                line, farmer_id
            ))
            .into());
        }
        farmers.push(Farmer {
            shop_name: shop_name.to_string(),
            farmer_id,
            name: optional_text(data, row, "Name"),
            village: optional_text(data, row, "Village"),
            phone: optional_text(data, row, "Phone"),
        });
    }
    Ok(farmers)
}

fn parse_milk_entries(
    shop_name: &str,
    data: &TabularData,
    rate_for: impl Fn(f64, f64) -> Option<f64>,
) -> Result<Vec<MilkEntry>> {
    let mut entries = Vec::new();
    for (line, row) in data_rows(data) {
        let date_text = required_text(data, row, "Date", line)?;
        let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT).map_err(|_| {
            BillingError::validation(format!(
                "Row {}: Date '{}' is not YYYY-MM-DD",
                line, date_text
            ))
        })?;
        let farmer_id = required_text(data, row, "FarmerID", line)?.to_string();
        let session = required_text(data, row, "Session", line)?
            .parse::<Session>()
            .map_err(|e| BillingError::validation(format!("Row {}: {}", line, e)))?;
        let litres = number_cell(data, row, "Litres", line)?;
        let fat = number_cell(data, row, "Fat", line)?;
        let clr = number_cell(data, row, "CLR", line)?;
        for (column, value) in [("Litres", litres), ("Fat", fat), ("CLR", clr)] {
            check_measure(column, value).map_err(|reason| row_error(line, reason))?;
        }

        let rate = match data.cell(row, "Rate") {
            Some(text) if !text.is_empty() => number_cell(data, row, "Rate", line)?,
            _ => rate_for(fat, clr).unwrap_or(0.0),
        };
        let amount = match data.cell(row, "Amount") {
            Some(text) if !text.is_empty() => number_cell(data, row, "Amount", line)?,
            _ => compute_amount(litres, rate),
        };
        check_amount(amount).map_err(|reason| row_error(line, reason))?;

        entries.push(MilkEntry {
            shop_name: shop_name.to_string(),
            date,
            farmer_id,
            session,
            litres,
            fat,
            clr,
            rate,
            amount,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RateChartEntry;
    use crate::storage::{
        FarmerRepository, MemoryConnection, MilkEntryRepository, RateChartRepository, RecordStore,
    };

    struct Fixture {
        service: ImportService,
        farmers: Arc<FarmerRepository>,
        milk: Arc<MilkEntryRepository>,
    }

    fn setup_test() -> Fixture {
        let store = RecordStore::new(Arc::new(MemoryConnection::new()));
        let farmers = Arc::new(FarmerRepository::open(store.clone()).unwrap());
        let milk = Arc::new(MilkEntryRepository::open(store.clone()).unwrap());
        let rates = Arc::new(RateChartRepository::open(store).unwrap());
        rates
            .replace_chart(vec![RateChartEntry { fat: 4.5, clr: 28.0, rate: 42.5 }])
            .unwrap();
        Fixture {
            service: ImportService::new(farmers.clone(), milk.clone(), rates),
            farmers,
            milk,
        }
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> TabularData {
        TabularData::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_farmer_import_sets_shop_and_optional_columns() {
        let fixture = setup_test();
        let data = table(
            &["FarmerID", "Name", "ShopName"],
            &[&["F1", "Ravi", "Elsewhere"], &["F2", "", ""]],
        );

        let result = fixture.service.import("ShopA", &data).unwrap();
        assert_eq!(result, ImportResult { kind: ImportKind::Farmers, imported: 2 });

        let farmers = fixture.farmers.list_farmers("ShopA").unwrap();
        assert_eq!(farmers.len(), 2);
        assert_eq!(farmers[0].name, "Ravi");
        assert_eq!(farmers[1].village, "");
        assert!(fixture.farmers.list_farmers("Elsewhere").unwrap().is_empty());
    }

    #[test]
    fn test_milk_import_resolves_missing_rate_and_amount() {
        let fixture = setup_test();
        let data = table(
            &["Date", "FarmerID", "Session", "Litres", "Fat", "CLR", "Rate", "Amount"],
            &[
                &["2024-03-01", "F1", "Morning", "10", "4.5", "28", "", ""],
                &["2024-03-01", "F2", "evening", "4", "3.9", "26", "", ""],
                &["2024-03-02", "F1", "Morning", "2", "4.5", "28", "40", "81"],
            ],
        );

        let result = fixture.service.import("ShopA", &data).unwrap();
        assert_eq!(result.kind, ImportKind::MilkEntries);
        assert_eq!(result.imported, 3);

        let entries = fixture.milk.list_entries("ShopA").unwrap();
        assert_eq!((entries[0].rate, entries[0].amount), (42.5, 425.0));
        assert_eq!((entries[1].rate, entries[1].amount), (0.0, 0.0));
        assert_eq!(entries[1].session, Session::Evening);
        assert_eq!((entries[2].rate, entries[2].amount), (40.0, 81.0));
    }

    #[test]
    fn test_milk_import_without_rate_columns() {
        let fixture = setup_test();
        let data = table(
            &["Date", "FarmerID", "Session", "Litres", "Fat", "CLR"],
            &[&["2024-03-01", "F1", "Morning", "2", "4.5", "28"]],
        );
        fixture.service.import("ShopA", &data).unwrap();
        let entries = fixture.milk.list_entries("ShopA").unwrap();
        assert_eq!(entries[0].amount, 85.0);
    }

    #[test]
    fn test_unrecognized_columns_are_rejected() {
        let fixture = setup_test();
        let err = fixture
            .service
            .import("ShopA", &table(&["Fat", "CLR", "Rate"], &[&["4.5", "28", "42.5"]]))
            .unwrap_err();
        assert!(matches!(
            BillingError::classify(&err),
            Some(BillingError::UnrecognizedImportFormat(_))
        ));
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let fixture = setup_test();
        let data = table(
            &["Date", "FarmerID", "Session", "Litres", "Fat", "CLR"],
            &[
                &["2024-03-01", "F1", "Morning", "2", "4.5", "28"],
                &["2024-03-01", "F1", "Noon", "2", "4.5", "28"],
            ],
        );
        let err = fixture.service.import("ShopA", &data).unwrap_err();
        assert!(err.to_string().contains("Row 3"));
        assert!(fixture.milk.list_entries("ShopA").unwrap().is_empty());

        let farmers = table(&["FarmerID", "Name"], &[&["F1", "Ravi"], &["", "Nobody"]]);
        fixture.service.import("ShopA", &farmers).unwrap_err();
        assert!(fixture.farmers.list_farmers("ShopA").unwrap().is_empty());
    }

    #[test]
    fn test_milk_import_rejects_negative_measures() {
        let fixture = setup_test();
        for (litres, fat, clr, column) in [
            ("-5", "4.5", "28", "Litres"),
            ("5", "-4.5", "28", "Fat"),
            ("5", "4.5", "-1", "CLR"),
        ] {
            let data = table(
                &["Date", "FarmerID", "Session", "Litres", "Fat", "CLR"],
                &[
                    &["2024-03-01", "F1", "Morning", "2", "4.5", "28"],
                    &["2024-03-01", "F1", "Evening", litres, fat, clr],
                ],
            );
            let err = fixture.service.import("ShopA", &data).unwrap_err();
            assert!(matches!(BillingError::classify(&err), Some(BillingError::Validation(_))));
            let message = err.to_string();
            assert!(message.contains("Row 3") && message.contains(column), "{}", message);
        }
        assert!(fixture.milk.list_entries("ShopA").unwrap().is_empty());
    }

    #[test]
    fn test_milk_import_rejects_overflowing_amount() {
        let fixture = setup_test();
        let data = table(
            &["Date", "FarmerID", "Session", "Litres", "Fat", "CLR", "Rate"],
            &[&["2024-03-01", "F1", "Morning", "5", "4.5", "28", "1e308"]],
        );
        let err = fixture.service.import("ShopA", &data).unwrap_err();
        assert!(err.to_string().contains("Row 2: Amount"));
        assert!(fixture.milk.list_entries("ShopA").unwrap().is_empty());
    }

    #[test]
    fn test_farmer_import_rejects_existing_ids() {
        let fixture = setup_test();
        fixture
            .service
            .import("ShopA", &table(&["FarmerID"], &[&["F1"]]))
            .unwrap();
        let err = fixture
            .service
            .import("ShopA", &table(&["FarmerID"], &[&["F2"], &["F1"]]))
            .unwrap_err();
        assert!(matches!(BillingError::classify(&err), Some(BillingError::Validation(_))));
        assert_eq!(fixture.farmers.list_farmers("ShopA").unwrap().len(), 1);

        let err = fixture
            .service
            .import("ShopA", &table(&["FarmerID"], &[&["F5"], &["F5"]]))
            .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }
}
