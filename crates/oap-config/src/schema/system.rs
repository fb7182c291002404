//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `tracing` filter directive for the workspace crates.
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "oap=trace",
            LogLevel::Debug => "oap=debug",
            LogLevel::Info => "oap=info",
            LogLevel::Warn => "oap=warn",
            LogLevel::Error => "oap=error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
