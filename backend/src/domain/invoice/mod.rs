//! Monthly milk bill for a shop.
//!
//! `render` turns a shop's entries into an `Invoice` (the table that goes on
//! paper); `pdf` lays that table out on pages. `InvoiceService` ties both to
//! the stored entries and the invoice directory.

pub mod pdf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::commands::invoices::GeneratedInvoice;
use crate::domain::errors::BillingError;
use crate::domain::models::{format_decimal, MilkEntry};
use crate::storage::traits::MilkEntryStorage;

/// Column titles of the bill table.
pub const BILL_HEADERS: [&str; 7] = ["Farmer", "Session", "Litres", "Fat", "CLR", "Rate", "Amount"];

/// Column widths in millimetres, same order as `BILL_HEADERS`.
pub const COLUMN_WIDTHS_MM: [f32; 7] = [40.0, 30.0, 25.0, 20.0, 20.0, 20.0, 25.0];

/// The bill as text: a title, a date line, a header row and one row per entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub title: String,
    pub date_line: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Invoice {
    /// Header row plus data rows.
    pub fn table_row_count(&self) -> usize {
        self.rows.len() + 1
    }
}

/// Build the bill for `entries`, keeping their order. There is no totals row.
pub fn render(shop_name: &str, entries: &[MilkEntry], generated_on: NaiveDate) -> Invoice {
    let rows = entries
        .iter()
        .map(|entry| {
            vec![
                entry.farmer_id.clone(),
                entry.session.to_string(),
                format_decimal(entry.litres),
                format_decimal(entry.fat),
                format_decimal(entry.clr),
                format_decimal(entry.rate),
                format_decimal(entry.amount),
            ]
        })
        .collect();

    Invoice {
        title: format!("{} - Monthly Milk Bill", shop_name),
        date_line: format!("Date: {}", generated_on.format("%Y-%m-%d")),
        header: BILL_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

/// `{shop}_monthly_bill.pdf`. Letters, digits, spaces, `-` and `.` are kept;
/// every other byte of the shop name (and a leading `.`) becomes `_XX` hex, so
/// distinct shops never share a file.
pub fn invoice_file_name(shop_name: &str) -> String {
    let mut safe = String::with_capacity(shop_name.len());
    for (index, c) in shop_name.char_indices() {
        let keep = c.is_alphanumeric() || matches!(c, ' ' | '-') || (c == '.' && index > 0);
        if keep {
            safe.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                safe.push_str(&format!("_{:02X}", byte));
            }
        }
    }
    format!("{}_monthly_bill.pdf", safe)
}

/// Service that renders a shop's bill and saves it as a PDF
#[derive(Clone)]
pub struct InvoiceService {
    milk_repository: Arc<dyn MilkEntryStorage>,
    invoice_directory: PathBuf,
}

impl InvoiceService {
    /// Create a new InvoiceService writing into `invoice_directory`
    pub fn new(milk_repository: Arc<dyn MilkEntryStorage>, invoice_directory: PathBuf) -> Self {
        Self {
            milk_repository,
            invoice_directory,
        }
    }

    /// Render today's bill for a shop
    pub fn generate_invoice(&self, shop_name: &str) -> Result<GeneratedInvoice> {
        self.generate_invoice_on(shop_name, Local::now().date_naive())
    }

    /// Render a shop's bill dated `generated_on`, save it, and return the bytes
    pub fn generate_invoice_on(
        &self,
        shop_name: &str,
        generated_on: NaiveDate,
    ) -> Result<GeneratedInvoice> {
        info!("Generating invoice for shop '{}'", shop_name);

        let entries = self.milk_repository.list_entries(shop_name)?;
        if entries.is_empty() {
            warn!("No milk data for shop '{}'", shop_name);
            return Err(BillingError::NoMilkData(shop_name.to_string()).into());
        }

        let invoice = render(shop_name, &entries, generated_on);
        let document = pdf::write_pdf(&invoice)?;

        fs::create_dir_all(&self.invoice_directory).with_context(|| {
            format!(
                "Failed to create invoice directory {}",
                self.invoice_directory.display()
            )
        })?;
        let file_path = self.invoice_directory.join(invoice_file_name(shop_name));
        fs::write(&file_path, &document.bytes)
            .with_context(|| format!("Failed to write invoice {}", file_path.display()))?;

        info!(
            "Invoice generated: {} ({} rows, {} pages)",
            file_path.display(),
            invoice.rows.len(),
            document.page_count
        );
        Ok(GeneratedInvoice {
            file_path,
            pdf: document.bytes,
            row_count: invoice.rows.len(),
            page_count: document.page_count,
        })
    }
}
