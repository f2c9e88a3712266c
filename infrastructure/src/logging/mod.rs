//! Logging infrastructure: the structured ballot event log.
//!
//! Provides [`JsonlBallotEventLogger`], a JSONL file writer that implements
//! the [`BallotEventLogger`](ballot_application::BallotEventLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlBallotEventLogger;
