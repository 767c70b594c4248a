//! Column metadata, derived descriptors and foreign-key bookkeeping
//!
//! A [`ColumnRecord`] is one row of `schema_columns` as the developer typed it.
//! The [`deriver`] turns it into a [`ColumnDescriptor`] (the JSON shape consumed
//! by form and CRUD generators), and the [`builder`] does that for a whole table
//! while collecting [`ReferenceFact`]s into a per-run [`ReferenceMap`].

use serde::{Deserialize, Serialize};

pub mod builder;
pub mod column_type;
pub mod deriver;
pub mod inflect;
pub mod options;

pub use builder::{SchemaBuilder, TableSchema};
pub use column_type::ColumnType;
pub use deriver::derive;
pub use options::ColumnOptions;

/// Columns managed by the framework itself. They never get a form widget or
/// validation rules.
pub const HIDDEN_COLUMNS: [&str; 4] = ["id", "created_at", "updated_at", "deleted_at"];

/// Whether `name` is one of [`HIDDEN_COLUMNS`]
pub fn is_hidden(name: &str) -> bool {
    HIDDEN_COLUMNS.contains(&name)
}

/// One row of `schema_tables`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default = "default_active", deserialize_with = "flag::deserialize")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl TableRecord {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), project: None, active: true }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Raw column metadata, as stored in `schema_columns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub name: String,
    /// Declared type (`id`, `string`, `float`, ...). Unknown values pass through.
    #[serde(rename = "type")]
    pub column_type: String,
    /// Comma-separated parameters, e.g. `"100"` for a string or `"8,2"` for a float
    #[serde(default)]
    pub type_details: String,
    /// Modifiers: `nullable`, `users`, or literal pipe-joined validation rules
    #[serde(default)]
    pub options: String,
}

impl ColumnRecord {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            type_details: String::new(),
            options: String::new(),
        }
    }

    pub fn with_details(mut self, type_details: impl Into<String>) -> Self {
        self.type_details = type_details.into();
        self
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = options.into();
        self
    }

    /// `id`-typed columns other than the primary key point at another table
    pub fn is_reference(&self) -> bool {
        self.column_type == "id" && self.name != "id"
    }
}

/// Derived descriptor for one column, serialized into `<table>.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub name: String,
    pub db_type: String,
    pub html_type: String,
    pub validations: String,
    pub searchable: bool,
    pub fillable: bool,
    pub primary: bool,
    pub in_form: bool,
    pub in_index: bool,
    pub in_view: bool,
}

/// A foreign-key-shaped column, kept until migration stubs are emitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceFact {
    pub column_name: String,
    pub referenced_table: String,
    /// Raw options string; the on-delete action is re-derived from it
    pub source_options: String,
}

impl ReferenceFact {
    pub fn options(&self) -> ColumnOptions {
        ColumnOptions::parse(&self.source_options)
    }
}

/// References found on one table, in column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReferences {
    pub table: String,
    pub references: Vec<ReferenceFact>,
}

/// Owning table -> ordered reference facts, for a single generation run.
///
/// Tables keep the order in which they were first recorded and facts keep
/// insertion order; that order becomes migration statement order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceMap {
    tables: Vec<TableReferences>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fact to `table`'s list
    pub fn record(&mut self, table: &str, fact: ReferenceFact) {
        match self.tables.iter_mut().find(|entry| entry.table == table) {
            Some(entry) => entry.references.push(fact),
            None => self
                .tables
                .push(TableReferences { table: table.to_string(), references: vec![fact] }),
        }
    }

    pub fn get(&self, table: &str) -> Option<&[ReferenceFact]> {
        self.tables
            .iter()
            .find(|entry| entry.table == table)
            .map(|entry| entry.references.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Number of tables with at least one reference
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableReferences> {
        self.tables.iter()
    }
}

impl<'a> IntoIterator for &'a ReferenceMap {
    type Item = &'a TableReferences;
    type IntoIter = std::slice::Iter<'a, TableReferences>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}

/// Lenient boolean for the `active` flag: CSV exports carry `1`/`0`,
/// `yes`/`no` or `true`/`false`; an empty cell means active.
mod flag {
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FlagVisitor)
    }

    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a boolean, 0/1, or yes/no")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            match v.trim().to_ascii_lowercase().as_str() {
                "" | "1" | "true" | "yes" | "y" | "on" => Ok(true),
                "0" | "false" | "no" | "n" | "off" => Ok(false),
                other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(true)
        }

        fn visit_none<E: de::Error>(self) -> Result<bool, E> {
            Ok(true)
        }
    }
}
