//! Storage, event log and diagnostics file locations
//! (`[storage]`, `[events]` and `[logging]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[storage]`: where voting requests are kept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// JSON snapshot file. Requests live only in memory when unset.
    pub path: Option<PathBuf>,
}

/// `[events]`: structured ballot event log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEventsConfig {
    /// JSONL file that events are appended to. Disabled when unset.
    pub log_file: Option<PathBuf>,
}

/// `[logging]`: diagnostic (tracing) output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily-rolling log files. Logs go to stderr only when unset.
    pub directory: Option<PathBuf>,
    /// File name prefix inside `directory`
    pub file_prefix: String,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_prefix: "ballot.log".to_string(),
        }
    }
}
