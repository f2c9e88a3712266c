//! Infrastructure layer for resolution-ballot
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod repository;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileDefaultsConfig, FileEventsConfig, FileLoggingConfig,
    FileOutputConfig, FileStorageConfig,
};
pub use logging::JsonlBallotEventLogger;
pub use repository::{InMemoryVotingRequestRepository, JsonFileRepository};
