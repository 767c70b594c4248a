//! Schemagen - Core
//!
//! Derives form/validation schema descriptors from column metadata, and
//! foreign-key migration stubs from the references found along the way.
//!
//! # Overview
//!
//! Column metadata lives in two control tables, `schema_tables` and
//! `schema_columns`. For every active table, schemagen writes a
//! `<table>.json` descriptor list (storage type, form widget, validation rule
//! string and visibility flags per column) and, for tables with `id`-typed
//! columns, a migration stub adding the matching foreign keys.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use schemagen_core::prelude::*;
//!
//! let config = SchemagenConfig::load()?;
//! let source = CsvSource::open("./schema")?;
//! let mut sink = DirectorySink::new("./public");
//!
//! let outcome = Generator::new(&config.migrations)?
//!     .generate(&source, &mut sink, &GenerateRequest::default())?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Architecture
//!
//! - [`schema`] - column descriptor derivation and per-table building
//! - [`migration`] - foreign-key migration stub assembly
//! - [`source`] - record sources (CSV, JSON, in-memory)
//! - [`sink`] - artifact sinks (directory, in-memory)
//! - [`generator`] - one generation run, from records to artifacts
//! - [`config`] - TOML + environment configuration
//! - [`logging`] - `log` + `env_logger` setup

pub mod config; // Configuration system with TOML support
pub mod generator;
pub mod logging; // env_logger setup for the standard log crate
pub mod migration;
pub mod schema;
pub mod sink;
pub mod source;

pub mod prelude;

pub use generator::{GenerateOutcome, GenerateRequest, Generator};
pub use schema::{ColumnDescriptor, ColumnRecord, ReferenceFact, ReferenceMap, TableRecord};

/// Main result type for schemagen
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for schemagen
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The migration template is unreadable or lacks a placeholder
    #[error("Template error: {0}")]
    Template(String),
    /// The record source could not be read or parsed
    #[error("Source error: {0}")]
    Source(String),
    /// An artifact could not be written; the run stops here
    #[error("Failed to write {path} for table '{table}': {source}")]
    Write {
        table: String,
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
