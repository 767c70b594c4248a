//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use schemagen_core::prelude::*;
//! ```

// === Generation ===
pub use crate::generator::{GenerateOutcome, GenerateRequest, Generator};

// === Configuration ===
pub use crate::config::{MigrationsConfig, SchemagenConfig, SourceKind};
pub use crate::logging::init_logging;

// === Records and descriptors ===
pub use crate::schema::{
    ColumnDescriptor, ColumnOptions, ColumnRecord, ColumnType, ReferenceFact, ReferenceMap,
    SchemaBuilder, TableRecord, TableSchema,
};

// === Migrations ===
pub use crate::migration::{MigrationAssembler, MigrationOptions, MigrationTemplate};

// === Sources and sinks ===
pub use crate::sink::{ArtifactSink, DirectorySink, MemorySink};
pub use crate::source::{CsvSource, JsonSource, MemorySource, RecordSource};

// === Errors ===
pub use crate::{Error, Result};
