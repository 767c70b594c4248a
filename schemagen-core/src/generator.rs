//! One generation run
//!
//! Reads the active tables from a [`RecordSource`], writes one `<table>.json`
//! descriptor list per table into an [`ArtifactSink`] and, when any table has
//! reference columns, one foreign-key migration stub per migration table.
//!
//! The run stops at the first failed write. Artifacts already written stay in
//! place; a rerun overwrites them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::MigrationsConfig;
use crate::migration::{MigrationAssembler, MigrationOptions, MigrationTemplate};
use crate::schema::builder::to_pretty_json;
use crate::schema::{ColumnRecord, SchemaBuilder, TableRecord};
use crate::sink::ArtifactSink;
use crate::source::RecordSource;
use crate::{Error, Result};

/// Default JSON indent, matching PHP's `JSON_PRETTY_PRINT`
pub const DEFAULT_INDENT: usize = 4;

/// Parameters of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Only tables whose `project` equals this
    pub project: Option<String>,
    /// Skip migration stubs even when references were found
    pub no_references: bool,
}

impl GenerateRequest {
    pub fn for_project(project: impl Into<String>) -> Self {
        Self { project: Some(project.into()), ..Self::default() }
    }

    pub fn without_references(mut self) -> Self {
        self.no_references = true;
        self
    }
}

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GenerateOutcome {
    /// Descriptors were written and no migration stubs were: table name ->
    /// the column records it was built from
    Tables(BTreeMap<String, Vec<ColumnRecord>>),
    /// Migration stubs were written, at these sink paths
    ReferencesWritten(Vec<String>),
}

/// Drives descriptor and migration generation
#[derive(Debug, Clone)]
pub struct Generator {
    assembler: MigrationAssembler,
    indent: usize,
}

impl Generator {
    /// Build a generator from configuration, loading the migration template
    /// up front so a bad template fails before anything is written
    pub fn new(config: &MigrationsConfig) -> Result<Self> {
        let template = config.template()?;
        let options = config.options(chrono::Local::now());
        Ok(Self::with_template(template, options))
    }

    pub fn with_template(template: MigrationTemplate, options: MigrationOptions) -> Self {
        Self { assembler: MigrationAssembler::new(template, options), indent: DEFAULT_INDENT }
    }

    /// JSON indent width in spaces
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn generate(
        &self,
        source: &dyn RecordSource,
        sink: &mut dyn ArtifactSink,
        request: &GenerateRequest,
    ) -> Result<GenerateOutcome> {
        let tables: Vec<TableRecord> =
            source.tables()?.into_iter().filter(|table| selected(table, request)).collect();

        if tables.is_empty() {
            match &request.project {
                Some(project) => log::warn!("No active tables for project '{}'", project),
                None => log::warn!("No active tables found"),
            }
        }

        let mut builder = SchemaBuilder::new();
        let mut written = BTreeMap::new();

        for table in &tables {
            let records = source.columns(table)?;
            let schema = builder.build_table(&table.name, &records);
            let json = schema.to_json(self.indent)?;

            let path = format!("{}.json", table.name);
            write(sink, &table.name, &path, &json)?;
            log::info!("Wrote {} ({} columns)", path, schema.columns.len());

            written.insert(table.name.clone(), records);
        }

        let references = builder.into_references();
        if references.is_empty() || request.no_references {
            if !references.is_empty() {
                log::info!("Skipping migration stubs for {} tables", references.len());
            }
            return Ok(GenerateOutcome::Tables(written));
        }

        let mut paths = Vec::new();
        for stub in self.assembler.assemble(&references) {
            write(sink, &stub.table, &stub.path, &stub.contents)?;
            log::info!("Wrote {}", stub.path);
            paths.push(stub.path);
        }
        Ok(GenerateOutcome::ReferencesWritten(paths))
    }
}

fn selected(table: &TableRecord, request: &GenerateRequest) -> bool {
    if !table.active {
        log::debug!("Skipping inactive table {}", table.name);
        return false;
    }
    match &request.project {
        Some(project) => table.project.as_deref() == Some(project.as_str()),
        None => true,
    }
}

fn write(sink: &mut dyn ArtifactSink, table: &str, path: &str, contents: &str) -> Result<()> {
    sink.put(path, contents).map_err(|source| {
        log::error!("Failed to write {} for table '{}': {}", path, table, source);
        Error::Write { table: table.to_string(), path: path.to_string(), source }
    })
}

/// Pretty-print any outcome value with the given indent
pub fn outcome_json(outcome: &GenerateOutcome, indent: usize) -> Result<String> {
    Ok(to_pretty_json(outcome, indent)?)
}
