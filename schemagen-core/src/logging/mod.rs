//! Logging setup
//!
//! Schemagen logs through the standard `log` macros (`info!` per table and
//! artifact, `debug!` per reference). [`init_logging`] installs an
//! `env_logger` backend writing to stderr in one of the [`LogFormat`]s, so
//! stdout stays free for command output.
//!
//! # Example
//!
//! ```rust,no_run
//! use schemagen_core::config::LoggingConfig;
//!
//! schemagen_core::logging::init_logging(&LoggingConfig::default()).unwrap();
//! log::info!("Generating descriptors");
//! ```

pub mod formatter;

pub use formatter::{LogEntry, LogFormat};

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::config::LoggingConfig;

/// Environment variable with `env_logger` filter directives, applied on top of
/// the configured level (e.g. `SG_LOG=schemagen_core::schema=debug`)
pub const FILTER_ENV: &str = "SG_LOG";

/// Log levels in order of severity (compatible with standard log crate)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Trace => LogLevel::Trace,
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: \"{}\"", other)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the global logger.
///
/// Safe to call more than once; only the first call takes effect.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = config.level()?;
    let format = config.format()?;

    let result = env_logger::Builder::new()
        .filter_level(level.into())
        .parse_env(env_logger::Env::new().filter(FILTER_ENV))
        .target(env_logger::Target::Stderr)
        .format(move |buf, record| {
            writeln!(buf, "{}", format.format_entry(&LogEntry::from_record(record)))
        })
        .try_init();

    if result.is_err() {
        log::debug!("Logger already initialized");
    }
    Ok(())
}
