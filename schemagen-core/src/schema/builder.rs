//! Per-table schema building
//!
//! A table's descriptor list always starts with a synthetic `id` and ends with
//! the `created_at` / `updated_at` timestamps; declared columns sit in between
//! in source order.

use serde::Serialize;

use super::deriver::derive;
use super::{ColumnDescriptor, ColumnRecord, ReferenceFact, ReferenceMap};

/// Finished descriptors of one table plus the references found on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnDescriptor>,
    pub references: Vec<ReferenceFact>,
}

impl TableSchema {
    /// Build the descriptors of `table_name` from its ordered column records
    pub fn build(table_name: &str, records: &[ColumnRecord]) -> Self {
        let synthetic_id = ColumnRecord::new("id", "id");
        let created_at = ColumnRecord::new("created_at", "timestamp");
        let updated_at = ColumnRecord::new("updated_at", "timestamp");

        let ordered = std::iter::once(&synthetic_id)
            .chain(records.iter())
            .chain([&created_at, &updated_at]);

        let mut columns = Vec::with_capacity(records.len() + 3);
        let mut references = Vec::new();
        for record in ordered {
            let (descriptor, reference) = derive(table_name, record);
            columns.push(descriptor);
            references.extend(reference);
        }

        Self { table: table_name.to_string(), columns, references }
    }

    /// Pretty-printed JSON array of the descriptors, indented by `indent` spaces
    pub fn to_json(&self, indent: usize) -> serde_json::Result<String> {
        to_pretty_json(&self.columns, indent)
    }
}

/// Builds tables for one generation run and accumulates their references.
///
/// Each run owns its own builder; the reference map is handed over with
/// [`SchemaBuilder::into_references`] once every table has been built.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    references: ReferenceMap,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_table(&mut self, table_name: &str, records: &[ColumnRecord]) -> TableSchema {
        let schema = TableSchema::build(table_name, records);
        for reference in &schema.references {
            log::debug!(
                "{}.{} references {}",
                table_name,
                reference.column_name,
                reference.referenced_table
            );
            self.references.record(table_name, reference.clone());
        }
        schema
    }

    pub fn references(&self) -> &ReferenceMap {
        &self.references
    }

    pub fn into_references(self) -> ReferenceMap {
        self.references
    }
}

pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(
    value: &T,
    indent: usize,
) -> serde_json::Result<String> {
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
