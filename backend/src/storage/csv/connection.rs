use csv::{ReaderBuilder, Writer};
use log::{debug, info};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::storage::table::TableSchema;
use crate::storage::traits::{StoreError, TableStorage};

/// CsvConnection maps each table schema to one CSV file in a data directory
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> anyhow::Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Get the file path backing a table
    pub fn table_path(&self, schema: &TableSchema) -> PathBuf {
        self.base_directory.join(schema.file_name)
    }
}

impl TableStorage for CsvConnection {
    fn read_rows(&self, schema: &TableSchema) -> Result<Option<Vec<Vec<String>>>, StoreError> {
        let file_path = self.table_path(schema);
        if !file_path.exists() {
            return Ok(None);
        }

        let io_err = |source| StoreError::Io {
            table: schema.name,
            source,
        };
        let csv_err = |source| StoreError::Csv {
            table: schema.name,
            source,
        };

        let file = File::open(&file_path).map_err(io_err)?;
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers = csv_reader.headers().map_err(csv_err)?;
        let found: Vec<&str> = headers.iter().map(str::trim).collect();
        if found != schema.columns {
            return Err(StoreError::Corrupt {
                table: schema.name,
                line: 1,
                reason: format!(
                    "header {:?} does not match expected columns {:?}",
                    found, schema.columns
                ),
            });
        }

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result.map_err(csv_err)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!("Read {} rows from {}", rows.len(), file_path.display());
        Ok(Some(rows))
    }

    fn write_rows(&self, schema: &TableSchema, rows: &[Vec<String>]) -> Result<(), StoreError> {
        let file_path = self.table_path(schema);
        let temp_path = file_path.with_extension("csv.tmp");

        let io_err = |source| StoreError::Io {
            table: schema.name,
            source,
        };
        let csv_err = |source| StoreError::Csv {
            table: schema.name,
            source,
        };

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(io_err)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));

            csv_writer.write_record(schema.columns).map_err(csv_err)?;
            for row in rows {
                csv_writer.write_record(row).map_err(csv_err)?;
            }
            csv_writer.flush().map_err(io_err)?;
        }

        // Atomic replace using temp file
        fs::rename(&temp_path, &file_path).map_err(io_err)?;
        debug!("Wrote {} rows to {}", rows.len(), file_path.display());
        Ok(())
    }
}
