//! Table-store adapters.
//!
//! The core treats its backing spreadsheet as a flat table store reached
//! through four operations: bulk read, append a row, locate a row by value,
//! delete a row by position. Everything travels as strings; numeric and date
//! interpretation is the core's responsibility, not the store's.
//!
//! Two adapters are provided: a CSV-file store (one `<Table>.csv` per table,
//! mirroring a sheet's CSV export) and an in-memory store for tests and
//! demos. Transport robustness for a real remote backend (auth, retries,
//! rate limits) is out of scope; any adapter only promises to be eventually
//! consistent with its latest write.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use crate::error::{BoardError, Result};

/// One table row: a mapping from column name to trimmed string value.
pub type Row = HashMap<String, String>;

/// Flat table store consumed by the core.
///
/// `read_table` preserves table row order. Positions returned by `find_row`
/// and consumed by `delete_row` are zero-based data-row indices (the header
/// row does not count). There is no snapshot isolation: two reads inside one
/// operation may observe different points in time.
pub trait TableStore {
    /// Read every row of the named table, in table order.
    fn read_table(&self, table: &str) -> Result<Vec<Row>>;

    /// Append one row of column values, in the table's column order.
    fn append_row(&self, table: &str, values: &[String]) -> Result<()>;

    /// Locate the first row containing a cell that exactly equals `key`
    /// (after trimming). Returns the zero-based data-row position.
    fn find_row(&self, table: &str, key: &str) -> Result<Option<usize>>;

    /// Delete the row at the given zero-based data-row position.
    fn delete_row(&self, table: &str, position: usize) -> Result<()>;
}

fn fetch_err(table: &str, cause: impl std::fmt::Display) -> BoardError {
    BoardError::Fetch { table: table.to_string(), cause: cause.to_string() }
}

fn write_err(table: &str, cause: impl std::fmt::Display) -> BoardError {
    BoardError::Write { table: table.to_string(), cause: cause.to_string() }
}

/// Table store backed by one CSV file per table under a data directory.
///
/// The file layout mirrors the CSV export of the original spreadsheet: a
/// header row naming the columns, then one row per record. Table files must
/// exist (with at least their header) before rows can be appended; the store
/// does not invent schemas.
pub struct CsvFileStore {
    dir: PathBuf,
}

impl CsvFileStore {
    /// Create a store rooted at the given data directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }

    /// Create a table file with the given header, for seeding fresh data
    /// directories. Fails if the table already exists.
    pub fn create_table(&self, table: &str, columns: &[&str]) -> Result<()> {
        let path = self.table_path(table);
        if path.exists() {
            return Err(write_err(table, "table already exists"));
        }
        let mut writer = csv::Writer::from_path(&path).map_err(|e| write_err(table, e))?;
        writer.write_record(columns).map_err(|e| write_err(table, e))?;
        writer.flush().map_err(|e| write_err(table, e))?;
        Ok(())
    }

    fn read_raw(&self, table: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let path = self.table_path(table);
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| fetch_err(table, e))?;

        let headers: Vec<String> =
            reader.headers().map_err(|e| fetch_err(table, e))?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| fetch_err(table, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok((headers, rows))
    }

    fn rewrite(&self, table: &str, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
        let path = self.table_path(table);
        let mut writer = csv::Writer::from_path(&path).map_err(|e| write_err(table, e))?;
        writer.write_record(headers).map_err(|e| write_err(table, e))?;
        for row in rows {
            writer.write_record(row).map_err(|e| write_err(table, e))?;
        }
        writer.flush().map_err(|e| write_err(table, e))?;
        Ok(())
    }
}

impl TableStore for CsvFileStore {
    fn read_table(&self, table: &str) -> Result<Vec<Row>> {
        let (headers, raw_rows) = self.read_raw(table)?;
        let rows = raw_rows.into_iter().map(|values| zip_row(&headers, &values)).collect();
        Ok(rows)
    }

    fn append_row(&self, table: &str, values: &[String]) -> Result<()> {
        let path = self.table_path(table);
        if !path.exists() {
            return Err(write_err(table, "table does not exist"));
        }

        let file = OpenOptions::new().append(true).open(&path).map_err(|e| write_err(table, e))?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(values).map_err(|e| write_err(table, e))?;
        writer.flush().map_err(|e| write_err(table, e))?;

        debug!(table, columns = values.len(), "appended row");
        Ok(())
    }

    fn find_row(&self, table: &str, key: &str) -> Result<Option<usize>> {
        let (_, rows) = self.read_raw(table)?;
        Ok(position_of(&rows, key))
    }

    fn delete_row(&self, table: &str, position: usize) -> Result<()> {
        let (headers, mut rows) = self.read_raw(table)?;
        if position >= rows.len() {
            return Err(write_err(table, format!("row {position} out of range ({} rows)", rows.len())));
        }
        rows.remove(position);
        self.rewrite(table, &headers, &rows)
    }
}

/// In-memory table store for tests, demos and seeding.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, MemTable>>,
}

struct MemTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) a table with the given header and no rows.
    pub fn create_table(&self, table: &str, columns: &[&str]) {
        let mut tables = self.lock();
        tables.insert(
            table.to_string(),
            MemTable { headers: columns.iter().map(|c| (*c).to_string()).collect(), rows: Vec::new() },
        );
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, MemTable>> {
        self.tables.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TableStore for MemoryStore {
    fn read_table(&self, table: &str) -> Result<Vec<Row>> {
        let tables = self.lock();
        let mem = tables.get(table).ok_or_else(|| fetch_err(table, "unknown table"))?;
        Ok(mem.rows.iter().map(|values| zip_row(&mem.headers, values)).collect())
    }

    fn append_row(&self, table: &str, values: &[String]) -> Result<()> {
        let mut tables = self.lock();
        let mem = tables.get_mut(table).ok_or_else(|| write_err(table, "unknown table"))?;
        mem.rows.push(values.to_vec());
        Ok(())
    }

    fn find_row(&self, table: &str, key: &str) -> Result<Option<usize>> {
        let tables = self.lock();
        let mem = tables.get(table).ok_or_else(|| fetch_err(table, "unknown table"))?;
        Ok(position_of(&mem.rows, key))
    }

    fn delete_row(&self, table: &str, position: usize) -> Result<()> {
        let mut tables = self.lock();
        let mem = tables.get_mut(table).ok_or_else(|| write_err(table, "unknown table"))?;
        if position >= mem.rows.len() {
            return Err(write_err(table, format!("row {position} out of range ({} rows)", mem.rows.len())));
        }
        mem.rows.remove(position);
        Ok(())
    }
}

fn zip_row(headers: &[String], values: &[String]) -> Row {
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let value = values.get(i).map(|v| v.trim().to_string()).unwrap_or_default();
            (header.clone(), value)
        })
        .collect()
}

fn position_of(rows: &[Vec<String>], key: &str) -> Option<usize> {
    let key = key.trim();
    rows.iter().position(|row| row.iter().any(|cell| cell.trim() == key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_row_pads_missing_values() {
        let headers = vec!["A".to_string(), "B".to_string()];
        let row = zip_row(&headers, &["1".to_string()]);
        assert_eq!(row["A"], "1");
        assert_eq!(row["B"], "");
    }

    #[test]
    fn position_of_matches_any_cell_trimmed() {
        let rows = vec![
            vec!["x".to_string(), "y".to_string()],
            vec!["a".to_string(), "  target  ".to_string()],
        ];
        assert_eq!(position_of(&rows, "target"), Some(1));
        assert_eq!(position_of(&rows, "missing"), None);
    }
}
