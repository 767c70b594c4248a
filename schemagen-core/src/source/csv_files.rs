//! Control tables exported as CSV
//!
//! A directory holding `schema_tables.csv` and `schema_columns.csv`, each with
//! a header row naming the fields.

use std::path::Path;

use serde::de::DeserializeOwned;

use super::{ColumnRow, ControlTables, RecordSource};
use crate::schema::{ColumnRecord, TableRecord};
use crate::{Error, Result};

pub const TABLES_FILE: &str = "schema_tables.csv";
pub const COLUMNS_FILE: &str = "schema_columns.csv";

/// Control tables loaded from a CSV export directory
#[derive(Debug, Clone)]
pub struct CsvSource {
    tables: ControlTables,
}

impl CsvSource {
    /// Read both files under `dir`
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::Source(format!("{} is not a directory", dir.display())));
        }

        let schema_tables: Vec<TableRecord> = read_rows(&dir.join(TABLES_FILE))?;
        let schema_columns: Vec<ColumnRow> = read_rows(&dir.join(COLUMNS_FILE))?;
        log::debug!(
            "Loaded {} tables and {} columns from {}",
            schema_tables.len(),
            schema_columns.len(),
            dir.display()
        );

        Ok(Self { tables: ControlTables { schema_tables, schema_columns } })
    }
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::Source(format!("cannot open {}: {}", path.display(), e)))?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T =
            result.map_err(|e| Error::Source(format!("bad row in {}: {}", path.display(), e)))?;
        rows.push(row);
    }
    Ok(rows)
}

impl RecordSource for CsvSource {
    fn tables(&self) -> Result<Vec<TableRecord>> {
        self.tables.tables()
    }

    fn columns(&self, table: &TableRecord) -> Result<Vec<ColumnRecord>> {
        self.tables.columns(table)
    }
}
