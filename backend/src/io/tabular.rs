//! Decoding of uploaded CSV and XLSX files into `TabularData`.
//!
//! The first row is the header. Cells are trimmed; numbers from spreadsheets
//! are written without a trailing `.0` when whole, and date cells become
//! `YYYY-MM-DD`.

use anyhow::Result;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::io::Cursor;

use crate::domain::errors::BillingError;
use crate::domain::models::{ImportFormat, TabularData};

/// Decode an uploaded file in the given format
pub fn parse_tabular(format: ImportFormat, bytes: &[u8]) -> Result<TabularData> {
    let data = match format {
        ImportFormat::Csv => parse_csv(bytes)?,
        ImportFormat::Xlsx => parse_xlsx(bytes)?,
    };
    if data.headers.iter().all(|h| h.is_empty()) {
        return Err(unreadable("the file has no header row"));
    }
    debug!(
        "Decoded {:?} upload: {} columns, {} rows",
        format,
        data.headers.len(),
        data.len()
    );
    Ok(data)
}

fn unreadable(reason: impl std::fmt::Display) -> anyhow::Error {
    warn!("Upload could not be read: {}", reason);
    BillingError::UnrecognizedImportFormat(reason.to_string()).into()
}

fn parse_csv(bytes: &[u8]) -> Result<TabularData> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| unreadable(format!("invalid CSV header: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| unreadable(format!("invalid CSV: {}", e)))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(TabularData::new(headers, rows))
}

fn parse_xlsx(bytes: &[u8]) -> Result<TabularData> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| unreadable(format!("not a readable spreadsheet: {}", e)))?;

    let Some(first_sheet) = workbook.sheet_names().first().cloned() else {
        return Err(unreadable("the workbook has no sheets"));
    };
    let range: Range<Data> = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| unreadable(format!("sheet '{}' is unreadable: {}", first_sheet, e)))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
    let headers = rows.next().unwrap_or_default();
    Ok(TabularData::new(headers, rows.collect()))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => datetime.date().format("%Y-%m-%d").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) => s.split('T').next().unwrap_or_default().to_string(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERROR:{:?}", e),
    }
}
