use std::str::FromStr;

use crate::domain::errors::BillingError;

/// File formats accepted for imports and rate chart uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Xlsx,
}

impl ImportFormat {
    /// Guess the format from an uploaded file name, defaulting to CSV.
    pub fn from_file_name(file_name: &str) -> Self {
        if file_name.to_ascii_lowercase().ends_with(".xlsx") {
            ImportFormat::Xlsx
        } else {
            ImportFormat::Csv
        }
    }
}

impl FromStr for ImportFormat {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ImportFormat::Csv),
            "xlsx" => Ok(ImportFormat::Xlsx),
            other => Err(BillingError::UnrecognizedImportFormat(format!(
                "unsupported file type '{}'",
                other
            ))),
        }
    }
}

/// A header row plus data rows, already decoded from CSV or a spreadsheet.
///
/// Cells are kept as text; each importer decides how to parse its columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Cell text for `column` in `row`, `None` when the column is absent.
    /// Short rows read as empty cells.
    pub fn cell<'a>(&'a self, row: &'a [String], column: &str) -> Option<&'a str> {
        self.column_index(column)
            .map(|index| row.get(index).map(|c| c.trim()).unwrap_or(""))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
