//! Output configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Widest accepted JSON indent
pub const MAX_INDENT: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory of the generated artifacts
    /// Env: SG_OUTPUT_DIR
    /// Default: "./public"
    pub dir: PathBuf,

    /// JSON indent width in spaces
    /// Env: SG_OUTPUT_INDENT
    /// Default: 4
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("./public"), indent: 4 }
    }
}

impl OutputConfig {
    pub fn merge(&mut self, other: Self) {
        self.dir = other.dir;
        self.indent = other.indent;
    }

    pub fn apply_env_vars(&mut self) {
        self.apply_env(|key| env::var(key).ok());
    }

    pub(crate) fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("SG_OUTPUT_DIR") {
            self.dir = PathBuf::from(dir);
        }
        if let Some(indent) = var("SG_OUTPUT_INDENT") {
            if let Ok(i) = indent.parse() {
                self.indent = i;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.dir.as_os_str().is_empty() {
            bail!("output.dir cannot be empty");
        }
        if self.indent > MAX_INDENT {
            bail!("output.indent must be at most {}, got {}", MAX_INDENT, self.indent);
        }
        Ok(())
    }
}
