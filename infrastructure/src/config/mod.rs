//! Configuration file loading for resolution-ballot
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `BALLOT_` environment variables (`__` separates section and key)
//! 2. `--config <path>` specified file
//! 3. Project root: `./ballot.toml` or `./.ballot.toml`
//! 4. Global: `$XDG_CONFIG_HOME/resolution-ballot/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileDefaultsConfig, FileEventsConfig, FileLoggingConfig, FileOutputConfig,
    FileStorageConfig,
};
pub use loader::ConfigLoader;
