//! Logging settings consumed by [`crate::init_logging`]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level (trace, debug, info, warn, error)
    pub level: String,

    pub format: LogFormat,

    /// Directory for rotated log files, `None` for console only
    pub log_dir: Option<PathBuf>,

    /// Keep logs for N days
    pub retention_days: u64,

    /// Keep the N most recent runs
    pub retention_runs: usize,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: "info".to_string(),
            format: LogFormat::Text,
            log_dir: None,
            retention_days: 30,
            retention_runs: 10,
        }
    }
}
