//! Record source configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::source::{CsvSource, JsonSource, RecordSource};

/// Format of the control-table export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Directory with `schema_tables.csv` and `schema_columns.csv`
    #[default]
    Csv,
    /// Single JSON document
    Json,
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(SourceKind::Csv),
            "json" => Ok(SourceKind::Json),
            other => Err(format!("unknown source kind: \"{}\"", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Env: SG_SOURCE_KIND
    /// Default: csv
    pub kind: SourceKind,

    /// CSV export directory or JSON file
    /// Env: SG_SOURCE_PATH
    /// Default: "./schema"
    pub path: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { kind: SourceKind::Csv, path: PathBuf::from("./schema") }
    }
}

impl SourceConfig {
    pub fn merge(&mut self, other: Self) {
        self.kind = other.kind;
        self.path = other.path;
    }

    pub fn apply_env_vars(&mut self) {
        self.apply_env(|key| env::var(key).ok());
    }

    pub(crate) fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(kind) = var("SG_SOURCE_KIND") {
            if let Ok(k) = kind.parse() {
                self.kind = k;
            }
        }
        if let Some(path) = var("SG_SOURCE_PATH") {
            self.path = PathBuf::from(path);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            bail!("source.path cannot be empty");
        }
        Ok(())
    }

    /// Open the configured source
    pub fn open(&self) -> crate::Result<Box<dyn RecordSource>> {
        open_source(self.kind, &self.path)
    }
}

pub fn open_source(kind: SourceKind, path: &Path) -> crate::Result<Box<dyn RecordSource>> {
    Ok(match kind {
        SourceKind::Csv => Box::new(CsvSource::open(path)?),
        SourceKind::Json => Box::new(JsonSource::open(path)?),
    })
}
