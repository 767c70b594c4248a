//! Logging configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

use crate::logging::{LogFormat, LogLevel};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Env: SG_LOG_LEVEL
    /// Default: "info"
    pub level: String,

    /// `human`, `json` or `logfmt`
    /// Env: SG_LOG_FORMAT
    /// Default: "human"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "human".to_string() }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        self.apply_env(|key| env::var(key).ok());
    }

    pub(crate) fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(level) = var("SG_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(format) = var("SG_LOG_FORMAT") {
            self.format = format;
        }
    }

    pub fn level(&self) -> Result<LogLevel> {
        self.level.parse::<LogLevel>().map_err(|e| anyhow!(e))
    }

    pub fn format(&self) -> Result<LogFormat> {
        self.format.parse::<LogFormat>().map_err(|e| anyhow!(e))
    }

    pub fn validate(&self) -> Result<()> {
        self.level()?;
        self.format()?;
        Ok(())
    }
}
