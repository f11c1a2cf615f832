//! In-memory table storage, used by tests and throwaway runs.

use log::debug;
use std::collections::HashMap;
use std::sync::Mutex;

use super::table::TableSchema;
use super::traits::{StoreError, TableStorage};

/// Keeps each table's rows in a map keyed by table name.
#[derive(Debug, Default)]
pub struct MemoryConnection {
    tables: Mutex<HashMap<&'static str, Vec<Vec<String>>>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned(schema: &TableSchema) -> StoreError {
        StoreError::Io {
            table: schema.name,
            source: std::io::Error::new(std::io::ErrorKind::Other, "memory table lock poisoned"),
        }
    }
}

impl TableStorage for MemoryConnection {
    fn read_rows(&self, schema: &TableSchema) -> Result<Option<Vec<Vec<String>>>, StoreError> {
        let tables = self.tables.lock().map_err(|_| Self::poisoned(schema))?;
        Ok(tables.get(schema.name).cloned())
    }

    fn write_rows(&self, schema: &TableSchema, rows: &[Vec<String>]) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().map_err(|_| Self::poisoned(schema))?;
        tables.insert(schema.name, rows.to_vec());
        debug!("Stored {} rows in memory table '{}'", rows.len(), schema.name);
        Ok(())
    }
}
