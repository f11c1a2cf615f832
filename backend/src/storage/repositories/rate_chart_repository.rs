use anyhow::Result;
use log::info;

use super::parse_decimal;
use crate::domain::models::{format_decimal, RateChartEntry};
use crate::storage::table::{Record, TableRepository, TableSchema};
use crate::storage::traits::RateChartStorage;

/// Repository for `rate_chart.csv`
pub type RateChartRepository = TableRepository<RateChartEntry>;

impl Record for RateChartEntry {
    const SCHEMA: TableSchema = TableSchema {
        name: "rate_chart",
        file_name: "rate_chart.csv",
        columns: &["Fat", "CLR", "Rate"],
    };

    fn to_row(&self) -> Vec<String> {
        vec![
            format_decimal(self.fat),
            format_decimal(self.clr),
            format_decimal(self.rate),
        ]
    }

    fn from_row(row: &[String]) -> std::result::Result<Self, String> {
        Ok(RateChartEntry {
            fat: parse_decimal(&row[0], "Fat")?,
            clr: parse_decimal(&row[1], "CLR")?,
            rate: parse_decimal(&row[2], "Rate")?,
        })
    }
}

impl RateChartStorage for TableRepository<RateChartEntry> {
    fn load_chart(&self) -> Result<Vec<RateChartEntry>> {
        self.snapshot()
    }

    fn replace_chart(&self, entries: Vec<RateChartEntry>) -> Result<usize> {
        let count = entries.len();
        self.mutate(|table| {
            table.replace_all(entries);
            Ok(())
        })?;
        info!("Rate chart replaced with {} entries", count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn entry(fat: f64, clr: f64, rate: f64) -> RateChartEntry {
        RateChartEntry { fat, clr, rate }
    }

    #[test]
    fn test_round_trip_keeps_exact_values() {
        let env = TestEnvironment::new().unwrap();
        let repo = RateChartRepository::open(env.record_store()).unwrap();
        let chart = vec![entry(4.5, 28.0, 42.5), entry(0.1 + 0.2, 27.0, 1.0 / 3.0), entry(6.0, 30.0, 55.0)];
        repo.replace_chart(chart.clone()).unwrap();

        let reopened = RateChartRepository::open(env.record_store()).unwrap();
        assert_eq!(reopened.load_chart().unwrap(), chart);

        let content = env.read_table_file("rate_chart.csv").unwrap();
        assert!(content.starts_with("Fat,CLR,Rate\n4.5,28.0,42.5\n"));
    }

    #[test]
    fn test_replace_chart_is_not_a_merge() {
        let env = TestEnvironment::new().unwrap();
        let repo = RateChartRepository::open(env.record_store()).unwrap();
        repo.replace_chart(vec![entry(4.5, 28.0, 42.5), entry(5.0, 29.0, 47.0)]).unwrap();
        repo.replace_chart(vec![entry(3.5, 26.0, 35.0)]).unwrap();

        assert_eq!(repo.load_chart().unwrap(), vec![entry(3.5, 26.0, 35.0)]);
    }

    #[test]
    fn test_non_numeric_cell_fails_load() {
        let env = TestEnvironment::new().unwrap();
        env.write_table_file(
            "rate_chart.csv",
            "Fat,CLR,Rate\n4.5,28,42.5\nhigh,28,40\n",
        )
        .unwrap();

        let err = RateChartRepository::open(env.record_store()).err().unwrap();
        assert!(err.to_string().contains("line 3"));
    }
}
