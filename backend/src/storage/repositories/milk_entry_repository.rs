use anyhow::Result;
use chrono::NaiveDate;
use log::info;

use super::parse_decimal;
use crate::domain::models::{format_decimal, MilkEntry, Session};
use crate::storage::table::{Record, TableRepository, TableSchema};
use crate::storage::traits::MilkEntryStorage;

/// Repository for `milk_data.csv`
pub type MilkEntryRepository = TableRepository<MilkEntry>;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

impl Record for MilkEntry {
    const SCHEMA: TableSchema = TableSchema {
        name: "milk_data",
        file_name: "milk_data.csv",
        columns: &[
            "ShopName", "Date", "FarmerID", "Session", "Litres", "Fat", "CLR", "Rate", "Amount",
        ],
    };

    fn to_row(&self) -> Vec<String> {
        vec![
            self.shop_name.clone(),
            self.date.format(DATE_FORMAT).to_string(),
            self.farmer_id.clone(),
            self.session.to_string(),
            format_decimal(self.litres),
            format_decimal(self.fat),
            format_decimal(self.clr),
            format_decimal(self.rate),
            format_decimal(self.amount),
        ]
    }

    fn from_row(row: &[String]) -> std::result::Result<Self, String> {
        let date = NaiveDate::parse_from_str(row[1].trim(), DATE_FORMAT)
            .map_err(|e| format!("Date '{}' is not YYYY-MM-DD: {}", row[1], e))?;
        let session = row[3].parse::<Session>().map_err(|e| e.to_string())?;
        Ok(MilkEntry {
            shop_name: row[0].clone(),
            date,
            farmer_id: row[2].clone(),
            session,
            litres: parse_decimal(&row[4], "Litres")?,
            fat: parse_decimal(&row[5], "Fat")?,
            clr: parse_decimal(&row[6], "CLR")?,
            rate: parse_decimal(&row[7], "Rate")?,
            amount: parse_decimal(&row[8], "Amount")?,
        })
    }
}

impl MilkEntryStorage for TableRepository<MilkEntry> {
    fn append_entry(&self, entry: &MilkEntry) -> Result<()> {
        self.mutate(|table| {
            table.append(entry.clone());
            Ok(())
        })?;
        info!(
            "Stored milk entry for farmer '{}' of shop '{}' on {}",
            entry.farmer_id, entry.shop_name, entry.date
        );
        Ok(())
    }

    fn append_entries(&self, entries: Vec<MilkEntry>) -> Result<usize> {
        let count = entries.len();
        self.mutate(|table| {
            for entry in entries {
                table.append(entry);
            }
            Ok(())
        })?;
        info!("Stored {} milk entries", count);
        Ok(count)
    }

    fn list_entries(&self, shop_name: &str) -> Result<Vec<MilkEntry>> {
        self.filter(|e| e.belongs_to(shop_name))
    }
}
