//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod defaults;
mod output;
mod storage;

pub use defaults::FileDefaultsConfig;
pub use output::FileOutputConfig;
pub use storage::{FileEventsConfig, FileLoggingConfig, FileStorageConfig};

use ballot_domain::{ConfigIssue, ConfigIssueCode, Severity};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Request storage
    pub storage: FileStorageConfig,
    /// Ballot event log
    pub events: FileEventsConfig,
    /// Diagnostic log files
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Values for fields a draft leaves out
    pub defaults: FileDefaultsConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. Draft defaults (calculation base, pass percentage range)
    /// 2. The snapshot file and the event log must not be the same file
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Draft defaults
        issues.extend(self.defaults.to_draft_defaults().1);

        // 2. File collisions
        if let (Some(store), Some(events)) = (&self.storage.path, &self.events.log_file)
            && store == events
        {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::ConflictingPaths {
                    fields: ("storage.path".to_string(), "events.log_file".to_string()),
                    path: events.display().to_string(),
                },
                message: format!(
                    "events.log_file and storage.path both point to {}",
                    events.display()
                ),
            });
        }

        issues
    }
}
