//! Typed tables on top of a `TableStorage` backend.

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};

use super::traits::{StoreError, TableStorage};

/// Name, file and column order of one persisted table.
///
/// The column order is the on-disk contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub file_name: &'static str,
    pub columns: &'static [&'static str],
}

/// A row type that knows its schema and how to convert to and from text cells.
pub trait Record: Clone + Send + Sync + 'static {
    const SCHEMA: TableSchema;

    fn to_row(&self) -> Vec<String>;

    /// Parse one row; the error text ends up in `StoreError::Corrupt`.
    fn from_row(row: &[String]) -> std::result::Result<Self, String>;
}

/// An in-memory table: rows in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R: Record> Table<R> {
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn from_rows(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn schema(&self) -> TableSchema {
        R::SCHEMA
    }

    /// Add one row at the end.
    pub fn append(&mut self, record: R) {
        self.rows.push(record);
    }

    /// Replace every row.
    pub fn replace_all(&mut self, rows: Vec<R>) {
        self.rows = rows;
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [R] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Loads and persists typed tables through an injected backend.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn TableStorage>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn TableStorage>) -> Self {
        Self { backend }
    }

    /// Load a table. A table that was never persisted loads as empty; any row
    /// that does not parse fails the whole load.
    pub fn load<R: Record>(&self) -> std::result::Result<Table<R>, StoreError> {
        let schema = R::SCHEMA;
        let Some(raw_rows) = self.backend.read_rows(&schema)? else {
            debug!("Table '{}' not persisted yet, starting empty", schema.name);
            return Ok(Table::empty());
        };

        let mut rows = Vec::with_capacity(raw_rows.len());
        for (index, raw) in raw_rows.iter().enumerate() {
            // Line 1 is the header row.
            let line = index + 2;
            if raw.len() != schema.columns.len() {
                return Err(StoreError::Corrupt {
                    table: schema.name,
                    line,
                    reason: format!(
                        "expected {} cells, found {}",
                        schema.columns.len(),
                        raw.len()
                    ),
                });
            }
            let record = R::from_row(raw).map_err(|reason| StoreError::Corrupt {
                table: schema.name,
                line,
                reason,
            })?;
            rows.push(record);
        }

        info!("Loaded {} rows from table '{}'", rows.len(), schema.name);
        Ok(Table::from_rows(rows))
    }

    /// Write the full table, replacing whatever was persisted before.
    pub fn persist<R: Record>(&self, table: &Table<R>) -> std::result::Result<(), StoreError> {
        let rows: Vec<Vec<String>> = table.rows().iter().map(Record::to_row).collect();
        self.backend.write_rows(&R::SCHEMA, &rows)?;
        debug!("Persisted {} rows to table '{}'", rows.len(), R::SCHEMA.name);
        Ok(())
    }
}

/// One loaded table guarded by a mutex, persisted after every mutation.
pub struct TableRepository<R: Record> {
    store: RecordStore,
    table: Mutex<Table<R>>,
}

impl<R: Record> TableRepository<R> {
    /// Load the table from the store.
    pub fn open(store: RecordStore) -> std::result::Result<Self, StoreError> {
        let table = store.load::<R>()?;
        Ok(Self {
            store,
            table: Mutex::new(table),
        })
    }

    /// Copy of every row in stored order.
    pub fn snapshot(&self) -> Result<Vec<R>> {
        let table = self.lock()?;
        Ok(table.rows().to_vec())
    }

    /// First row matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&R) -> bool) -> Result<Option<R>> {
        let table = self.lock()?;
        Ok(table.rows().iter().find(|r| predicate(r)).cloned())
    }

    /// Every row matching `predicate`, in stored order.
    pub fn filter(&self, predicate: impl Fn(&R) -> bool) -> Result<Vec<R>> {
        let table = self.lock()?;
        Ok(table.rows().iter().filter(|r| predicate(r)).cloned().collect())
    }

    /// Read-modify-write under the table lock.
    ///
    /// `change` edits the table; when it succeeds the table is persisted.
    /// If either step fails the in-memory rows are restored, so callers never
    /// observe a half-applied mutation.
    pub fn mutate<T>(&self, change: impl FnOnce(&mut Table<R>) -> Result<T>) -> Result<T> {
        let mut table = self.lock()?;
        let before = table.clone();

        let outcome = match change(&mut *table) {
            Ok(value) => value,
            Err(e) => {
                *table = before;
                return Err(e);
            }
        };

        if let Err(e) = self.store.persist(&*table) {
            warn!(
                "Persist failed for table '{}', rolling back in-memory change: {}",
                R::SCHEMA.name,
                e
            );
            *table = before;
            return Err(e.into());
        }

        Ok(outcome)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Table<R>>> {
        self.table
            .lock()
            .map_err(|_| anyhow!("Table '{}' lock poisoned", R::SCHEMA.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryConnection;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        key: String,
        value: i64,
    }

    impl Record for Note {
        const SCHEMA: TableSchema = TableSchema {
            name: "notes",
            file_name: "notes.csv",
            columns: &["Key", "Value"],
        };

        fn to_row(&self) -> Vec<String> {
            vec![self.key.clone(), self.value.to_string()]
        }

        fn from_row(row: &[String]) -> std::result::Result<Self, String> {
            Ok(Note {
                key: row[0].clone(),
                value: row[1].parse().map_err(|e| format!("bad Value: {}", e))?,
            })
        }
    }

    fn note(key: &str, value: i64) -> Note {
        Note {
            key: key.to_string(),
            value,
        }
    }

    fn memory_store() -> (RecordStore, Arc<MemoryConnection>) {
        let backend = Arc::new(MemoryConnection::new());
        (RecordStore::new(backend.clone()), backend)
    }

    #[test]
    fn test_load_missing_table_is_empty() {
        let (store, _) = memory_store();
        let table = store.load::<Note>().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.schema().columns, &["Key", "Value"]);
    }

    #[test]
    fn test_persist_then_load_preserves_order() {
        let (store, _) = memory_store();
        let mut table = Table::empty();
        table.append(note("b", 2));
        table.append(note("a", 1));
        table.append(note("c", 3));
        store.persist(&table).unwrap();

        let loaded = store.load::<Note>().unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_replace_all_discards_previous_rows() {
        let mut table = Table::from_rows(vec![note("a", 1), note("b", 2)]);
        table.replace_all(vec![note("z", 26)]);
        assert_eq!(table.rows(), &[note("z", 26)]);
    }

    #[test]
    fn test_load_reports_unparseable_row_with_line() {
        let (store, backend) = memory_store();
        backend
            .write_rows(
                &Note::SCHEMA,
                &[
                    vec!["a".to_string(), "1".to_string()],
                    vec!["b".to_string(), "two".to_string()],
                ],
            )
            .unwrap();

        match store.load::<Note>() {
            Err(StoreError::Corrupt { table, line, .. }) => {
                assert_eq!(table, "notes");
                assert_eq!(line, 3);
            }
            other => panic!("expected corrupt table error, got {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn test_load_rejects_wrong_cell_count() {
        let (store, backend) = memory_store();
        backend
            .write_rows(&Note::SCHEMA, &[vec!["only-one".to_string()]])
            .unwrap();
        assert!(matches!(store.load::<Note>(), Err(StoreError::Corrupt { line: 2, .. })));
    }

    #[test]
    fn test_mutate_persists_on_success() {
        let (store, _) = memory_store();
        let repo = TableRepository::<Note>::open(store.clone()).unwrap();

        repo.mutate(|table| {
            table.append(note("a", 1));
            Ok(())
        })
        .unwrap();

        assert_eq!(store.load::<Note>().unwrap().rows(), &[note("a", 1)]);
        assert_eq!(repo.snapshot().unwrap(), vec![note("a", 1)]);
    }

    #[test]
    fn test_mutate_rolls_back_when_change_fails() {
        let (store, _) = memory_store();
        let repo = TableRepository::<Note>::open(store).unwrap();
        repo.mutate(|table| {
            table.append(note("a", 1));
            Ok(())
        })
        .unwrap();

        let result: Result<()> = repo.mutate(|table| {
            table.append(note("b", 2));
            Err(anyhow!("rejected"))
        });

        assert!(result.is_err());
        assert_eq!(repo.snapshot().unwrap(), vec![note("a", 1)]);
    }

    #[test]
    fn test_find_and_filter() {
        let (store, _) = memory_store();
        let repo = TableRepository::<Note>::open(store).unwrap();
        repo.mutate(|table| {
            table.append(note("a", 1));
            table.append(note("b", 2));
            table.append(note("a", 3));
            Ok(())
        })
        .unwrap();

        assert_eq!(repo.find(|n| n.key == "a").unwrap(), Some(note("a", 1)));
        assert_eq!(repo.filter(|n| n.key == "a").unwrap().len(), 2);
        assert_eq!(repo.find(|n| n.key == "zz").unwrap(), None);
    }
}
