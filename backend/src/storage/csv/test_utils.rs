//! Scratch data directories for storage tests.
//!
//! Each `TestEnvironment` owns a fresh temporary directory that is removed on
//! drop, so tests can write, corrupt and inspect table files freely.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use super::connection::CsvConnection;
use crate::storage::table::RecordStore;

pub struct TestEnvironment {
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    /// The data directory
    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    /// A record store over this directory's CSV files
    pub fn record_store(&self) -> RecordStore {
        RecordStore::new(Arc::new(self.connection.clone()))
    }

    /// Raw contents of a table file, e.g. `"users.csv"`
    pub fn read_table_file(&self, file_name: &str) -> Result<String> {
        Ok(fs::read_to_string(self.base_path.join(file_name))?)
    }

    /// Overwrite a table file, as an operator editing it by hand would
    pub fn write_table_file(&self, file_name: &str, contents: &str) -> Result<()> {
        fs::write(self.base_path.join(file_name), contents)?;
        Ok(())
    }
}
