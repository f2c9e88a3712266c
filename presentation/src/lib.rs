//! Presentation layer for resolution-ballot
//!
//! This crate contains CLI definitions and output formatters.

pub mod cli;
pub mod config;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{
    AudienceArgs, Cli, Command, ExtensionCommand, OutputFormat, ReviewCommand,
};
pub use config::OutputConfig;
pub use output::console::ConsoleFormatter;
pub use output::formatter::{ConfigReport, ConfigSource, OutputFormatter, VoteReceipt};
pub use output::json::JsonFormatter;
