//! Migration stub configuration

use anyhow::{bail, Result};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::migration::{self, MigrationOptions, MigrationTemplate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationsConfig {
    /// Custom stub with `XXXX-UP-XXXX` / `XXXX-DOWN-XXXX` placeholders
    /// Env: SG_MIGRATION_TEMPLATE
    /// Default: None (built-in Laravel stub)
    pub template: Option<PathBuf>,

    /// Emit `->onDelete(...)` on foreign keys
    /// Env: SG_MIGRATION_CASCADE
    /// Default: true
    pub cascade_deletes: bool,

    /// `set null` instead of `cascade` for nullable references
    /// Env: SG_MIGRATION_SET_NULL
    /// Default: false
    pub set_null_on_nullable: bool,

    /// Fixed file name prefix instead of the run start time
    /// Env: SG_MIGRATION_TIMESTAMP
    /// Default: None
    pub timestamp: Option<String>,

    /// Directory of the stubs, relative to the output dir
    /// Env: SG_MIGRATION_DIR
    /// Default: "migrations/references"
    pub directory: String,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            template: None,
            cascade_deletes: true,
            set_null_on_nullable: false,
            timestamp: None,
            directory: migration::DEFAULT_DIRECTORY.to_string(),
        }
    }
}

impl MigrationsConfig {
    pub fn merge(&mut self, other: Self) {
        self.template = other.template;
        self.cascade_deletes = other.cascade_deletes;
        self.set_null_on_nullable = other.set_null_on_nullable;
        self.timestamp = other.timestamp;
        self.directory = other.directory;
    }

    pub fn apply_env_vars(&mut self) {
        self.apply_env(|key| env::var(key).ok());
    }

    pub(crate) fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(template) = var("SG_MIGRATION_TEMPLATE") {
            self.template = Some(PathBuf::from(template));
        }
        if let Some(cascade) = var("SG_MIGRATION_CASCADE") {
            self.cascade_deletes = cascade.parse().unwrap_or(self.cascade_deletes);
        }
        if let Some(set_null) = var("SG_MIGRATION_SET_NULL") {
            self.set_null_on_nullable = set_null.parse().unwrap_or(self.set_null_on_nullable);
        }
        if let Some(timestamp) = var("SG_MIGRATION_TIMESTAMP") {
            self.timestamp = Some(timestamp);
        }
        if let Some(dir) = var("SG_MIGRATION_DIR") {
            self.directory = dir;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.directory.trim().is_empty() {
            bail!("migrations.directory cannot be empty");
        }
        if self.directory.starts_with('/') || self.directory.split('/').any(|s| s == "..") {
            bail!("migrations.directory must stay inside the output dir: {}", self.directory);
        }
        if let Some(ts) = &self.timestamp {
            if ts.is_empty() || ts.contains('/') {
                bail!("invalid migrations.timestamp: \"{}\"", ts);
            }
        }
        Ok(())
    }

    /// The configured template, or the built-in one
    pub fn template(&self) -> crate::Result<MigrationTemplate> {
        match &self.template {
            Some(path) => MigrationTemplate::from_file(path),
            None => Ok(MigrationTemplate::builtin()),
        }
    }

    /// Statement and naming options for a run started at `now`
    pub fn options<Tz: TimeZone>(&self, now: DateTime<Tz>) -> MigrationOptions
    where
        Tz::Offset: std::fmt::Display,
    {
        let timestamp =
            self.timestamp.clone().unwrap_or_else(|| migration::format_timestamp(now));
        MigrationOptions {
            cascade_deletes: self.cascade_deletes,
            set_null_on_nullable: self.set_null_on_nullable,
            timestamp,
            directory: self.directory.clone(),
        }
    }
}
