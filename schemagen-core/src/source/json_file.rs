//! Control tables exported as a single JSON document:
//! `{"schema_tables": [...], "schema_columns": [...]}`

use std::path::Path;

use super::{ControlTables, RecordSource};
use crate::schema::{ColumnRecord, TableRecord};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct JsonSource {
    tables: ControlTables,
}

impl JsonSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Source(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&text).map_err(|e| Error::Source(format!("{} ({})", e, path.display())))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let tables: ControlTables = serde_json::from_str(text)
            .map_err(|e| Error::Source(format!("invalid control tables: {}", e)))?;
        Ok(Self { tables })
    }
}

impl RecordSource for JsonSource {
    fn tables(&self) -> Result<Vec<TableRecord>> {
        self.tables.tables()
    }

    fn columns(&self, table: &TableRecord) -> Result<Vec<ColumnRecord>> {
        self.tables.columns(table)
    }
}
