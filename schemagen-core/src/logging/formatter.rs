//! Log line formatting

use std::fmt;
use std::str::FromStr;

use super::LogLevel;

/// One log line before formatting
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Module path of the call site
    pub target: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            level,
            message: message.into(),
            target: target.into(),
        }
    }

    pub fn from_record(record: &log::Record) -> Self {
        Self::new(record.level().into(), record.args().to_string(), record.target())
    }
}

/// How log lines are rendered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// `2024-01-15 10:30:00.000 INFO  [schemagen_core::generator] Wrote posts.json`
    #[default]
    Human,
    /// One JSON object per line
    Json,
    /// `key=value` pairs
    Logfmt,
}

impl LogFormat {
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self {
            LogFormat::Json => format_json(entry),
            LogFormat::Human => format_human(entry),
            LogFormat::Logfmt => format_logfmt(entry),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Human => "human",
            LogFormat::Json => "json",
            LogFormat::Logfmt => "logfmt",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(LogFormat::Human),
            "json" => Ok(LogFormat::Json),
            "logfmt" => Ok(LogFormat::Logfmt),
            other => Err(format!("unknown log format: \"{}\"", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn format_json(entry: &LogEntry) -> String {
    let mut json = serde_json::Map::new();
    json.insert("timestamp".to_string(), entry.timestamp.to_rfc3339().into());
    json.insert("level".to_string(), entry.level.as_str().into());
    json.insert("message".to_string(), entry.message.clone().into());
    json.insert("target".to_string(), entry.target.clone().into());

    serde_json::to_string(&json).unwrap_or_else(|_| "Failed to serialize log entry".to_string())
}

fn format_human(entry: &LogEntry) -> String {
    let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
    format!("{} {:5} [{}] {}", timestamp, entry.level.as_str(), entry.target, entry.message)
}

fn format_logfmt(entry: &LogEntry) -> String {
    let parts = [
        format!("timestamp={}", entry.timestamp.to_rfc3339()),
        format!("level={}", entry.level.as_str()),
        format!("target={}", entry.target),
        format!("message=\"{}\"", entry.message.replace('"', "\\\"")),
    ];
    parts.join(" ")
}
