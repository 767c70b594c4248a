//! Configuration system for schemagen
//!
//! # Configuration Hierarchy
//!
//! Configuration values are resolved in the following order (highest priority wins):
//!
//! 1. **Code** (CLI flags, builder calls) - Highest priority
//! 2. **Environment Variables** (`SG_*`) - Override file config
//! 3. **Config File** (schemagen.toml) - Override defaults
//! 4. **Defaults** - Lowest priority
//!
//! # Example
//!
//! ```no_run
//! use schemagen_core::config::SchemagenConfig;
//!
//! // Load with full supersedence
//! let config = SchemagenConfig::load()?;
//!
//! // Or load from specific file
//! let config = SchemagenConfig::from_file("schemagen.toml")?;
//!
//! // Or use defaults
//! let config = SchemagenConfig::default();
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! A complete file:
//!
//! ```toml
//! [source]
//! kind = "csv"
//! path = "./schema"
//!
//! [output]
//! dir = "./public"
//! indent = 4
//!
//! [migrations]
//! cascade_deletes = true
//! directory = "migrations/references"
//!
//! [logging]
//! level = "info"
//! format = "human"
//! ```

pub mod logging;
pub mod migrations;
pub mod output;
pub mod source;

pub use logging::LoggingConfig;
pub use migrations::MigrationsConfig;
pub use output::OutputConfig;
pub use source::{SourceConfig, SourceKind};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "schemagen.toml";

/// Complete schemagen configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemagenConfig {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub migrations: MigrationsConfig,
    pub logging: LoggingConfig,
}

impl SchemagenConfig {
    /// Load configuration with full supersedence chain
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (schemagen.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file; a missing file means defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        }

        config.apply_env_vars();

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.source.merge(other.source);
        self.output.merge(other.output);
        self.migrations.merge(other.migrations);
        self.logging.merge(other.logging);
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.source.apply_env_vars();
        self.output.apply_env_vars();
        self.migrations.apply_env_vars();
        self.logging.apply_env_vars();
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.source.validate().context("Invalid [source] section")?;
        self.output.validate().context("Invalid [output] section")?;
        self.migrations.validate().context("Invalid [migrations] section")?;
        self.logging.validate().context("Invalid [logging] section")?;
        Ok(())
    }
}
