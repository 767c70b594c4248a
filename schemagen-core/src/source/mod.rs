//! Record sources
//!
//! A [`RecordSource`] supplies the rows of the two control tables:
//! `schema_tables` (one row per table) and `schema_columns` (one row per
//! declared column, linked by `table_id`). Tables come back sorted by name,
//! columns in definition order.
//!
//! Both file formats load into [`ControlTables`], which is also the in-memory
//! source used by tests and embedders.

use serde::{Deserialize, Serialize};

use crate::schema::{ColumnRecord, TableRecord};
use crate::Result;

pub mod csv_files;
pub mod json_file;

pub use csv_files::CsvSource;
pub use json_file::JsonSource;

/// Supplies table and column metadata for a generation run
pub trait RecordSource {
    /// All tables, sorted by name
    fn tables(&self) -> Result<Vec<TableRecord>>;

    /// Columns of `table`, in definition order
    fn columns(&self, table: &TableRecord) -> Result<Vec<ColumnRecord>>;
}

/// One row of `schema_columns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRow {
    pub table_id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub type_details: Option<String>,
    #[serde(default)]
    pub options: Option<String>,
}

impl ColumnRow {
    pub fn to_record(&self) -> ColumnRecord {
        ColumnRecord {
            name: self.name.clone(),
            column_type: self.column_type.clone(),
            type_details: self.type_details.clone().unwrap_or_default(),
            options: self.options.clone().unwrap_or_default(),
        }
    }
}

/// Both control tables held in memory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlTables {
    #[serde(default)]
    pub schema_tables: Vec<TableRecord>,
    #[serde(default)]
    pub schema_columns: Vec<ColumnRow>,
}

/// In-memory source, built with [`ControlTables::with_table`] and
/// [`ControlTables::with_column`]
pub type MemorySource = ControlTables;

impl ControlTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: TableRecord) -> Self {
        self.schema_tables.push(table);
        self
    }

    /// Add a column to the table with id `table_id`
    pub fn with_column(mut self, table_id: u64, column: ColumnRecord) -> Self {
        self.schema_columns.push(ColumnRow {
            table_id,
            name: column.name,
            column_type: column.column_type,
            type_details: Some(column.type_details),
            options: Some(column.options),
        });
        self
    }
}

impl RecordSource for ControlTables {
    fn tables(&self) -> Result<Vec<TableRecord>> {
        let mut tables = self.schema_tables.clone();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tables)
    }

    fn columns(&self, table: &TableRecord) -> Result<Vec<ColumnRecord>> {
        Ok(self
            .schema_columns
            .iter()
            .filter(|row| row.table_id == table.id)
            .map(ColumnRow::to_record)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ControlTables {
        ControlTables::new()
            .with_table(TableRecord::new(2, "posts"))
            .with_table(TableRecord::new(1, "authors"))
            .with_column(2, ColumnRecord::new("title", "string"))
            .with_column(1, ColumnRecord::new("name", "string"))
            .with_column(2, ColumnRecord::new("author_id", "id"))
    }

    #[test]
    fn test_tables_are_sorted_by_name() {
        let names: Vec<String> =
            sample().tables().unwrap().into_iter().map(|table| table.name).collect();
        assert_eq!(names, vec!["authors", "posts"]);
    }

    #[test]
    fn test_columns_keep_definition_order() {
        let source = sample();
        let columns = source.columns(&TableRecord::new(2, "posts")).unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["title", "author_id"]);
    }

    #[test]
    fn test_missing_details_become_empty_strings() {
        let row = ColumnRow {
            table_id: 1,
            name: "body".to_string(),
            column_type: "text".to_string(),
            type_details: None,
            options: None,
        };
        let record = row.to_record();
        assert_eq!(record.type_details, "");
        assert_eq!(record.options, "");
    }
}
