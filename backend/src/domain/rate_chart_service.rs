use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::errors::BillingError;
use crate::domain::models::{RateChartEntry, TabularData};
use crate::storage::traits::RateChartStorage;

const RATE_CHART_COLUMNS: [&str; 3] = ["Fat", "CLR", "Rate"];

/// Service for the shared (fat, clr) → rate chart
#[derive(Clone)]
pub struct RateChartService {
    rate_chart_repository: Arc<dyn RateChartStorage>,
}

impl RateChartService {
    /// Create a new RateChartService
    pub fn new(rate_chart_repository: Arc<dyn RateChartStorage>) -> Self {
        Self {
            rate_chart_repository,
        }
    }

    /// Replace the whole chart with an uploaded table.
    ///
    /// The upload must carry exactly the Fat, CLR and Rate columns, in any
    /// order. Every row is checked before the chart is touched.
    pub fn upload_rate_chart(&self, data: &TabularData) -> Result<Vec<RateChartEntry>> {
        info!("Uploading rate chart with {} rows", data.len());

        let has_exact_columns = data.headers.len() == RATE_CHART_COLUMNS.len()
            && RATE_CHART_COLUMNS.iter().all(|c| data.has_column(c));
        if !has_exact_columns {
            warn!("Rate chart upload has columns {:?}", data.headers);
            return Err(BillingError::UnrecognizedImportFormat(
                "Rate chart needs exactly the columns Fat, CLR, Rate".to_string(),
            )
            .into());
        }

        let mut entries = Vec::with_capacity(data.len());
        for (index, row) in data.rows.iter().enumerate() {
            if row.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            // Row 1 is the header.
            let line = index + 2;
            entries.push(RateChartEntry {
                fat: number_cell(data, row, "Fat", line)?,
                clr: number_cell(data, row, "CLR", line)?,
                rate: number_cell(data, row, "Rate", line)?,
            });
        }

        self.rate_chart_repository.replace_chart(entries.clone())?;
        info!("Rate chart now has {} entries", entries.len());
        Ok(entries)
    }

    /// The current chart in stored order
    pub fn rate_chart(&self) -> Result<Vec<RateChartEntry>> {
        self.rate_chart_repository.load_chart()
    }
}

/// Parse a required numeric cell of an uploaded or imported table.
pub(crate) fn number_cell(
    data: &TabularData,
    row: &[String],
    column: &str,
    line: usize,
) -> Result<f64> {
    let text = data.cell(row, column).unwrap_or("");
    if text.is_empty() {
        return Err(BillingError::validation(format!("Row {}: {} is required", line, column)).into());
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(BillingError::validation(format!(
            "Row {}: {} is not a number: '{}'",
            line, column, text
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryConnection, RateChartRepository, RecordStore};

    fn setup_test() -> RateChartService {
        let store = RecordStore::new(Arc::new(MemoryConnection::new()));
        RateChartService::new(Arc::new(RateChartRepository::open(store).unwrap()))
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
    fn test_upload_replaces_chart() {
        let service = setup_test();
        service
            .upload_rate_chart(&table(&["Fat", "CLR", "Rate"], &[&["4.5", "28", "42.5"]]))
            .unwrap();
        service
            .upload_rate_chart(&table(
                &["Rate", "Fat", "CLR"],
                &[&["45", "5.0", "28"], &["50", "5.5", "29"]],
            ))
            .unwrap();

        let chart = service.rate_chart().unwrap();
        assert_eq!(
            chart,
            vec![
                RateChartEntry { fat: 5.0, clr: 28.0, rate: 45.0 },
                RateChartEntry { fat: 5.5, clr: 29.0, rate: 50.0 },
            ]
        );
    }

    #[test]
    fn test_upload_requires_exact_columns() {
        let service = setup_test();
        for headers in [
            vec!["Fat", "CLR"],
            vec!["Fat", "CLR", "Rate", "Extra"],
            vec!["Fat", "SNF", "Rate"],
        ] {
            let err = service.upload_rate_chart(&table(&headers, &[])).unwrap_err();
            assert!(matches!(
                BillingError::classify(&err),
                Some(BillingError::UnrecognizedImportFormat(_))
            ));
        }
    }

    #[test]
    fn test_bad_row_leaves_previous_chart_in_place() {
        let service = setup_test();
        service
            .upload_rate_chart(&table(&["Fat", "CLR", "Rate"], &[&["4.5", "28", "42.5"]]))
            .unwrap();

        let err = service
            .upload_rate_chart(&table(
                &["Fat", "CLR", "Rate"],
                &[&["5.0", "28", "45"], &["5.5", "abc", "50"]],
            ))
            .unwrap_err();
        assert!(err.to_string().contains("Row 3"));
        assert_eq!(service.rate_chart().unwrap().len(), 1);
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let service = setup_test();
        let entries = service
            .upload_rate_chart(&table(
                &["Fat", "CLR", "Rate"],
                &[&["4.5", "28", "42.5"], &["", "", ""]],
            ))
            .unwrap();
        assert_eq!(entries.len(), 1);
    }
}
