//! Port for the structured ballot event log.
//!
//! Defines the [`BallotEventLogger`] trait for recording what happened to
//! voting requests (creation, publication, ballots, reviews, extensions) in
//! a machine-readable audit trail.
//!
//! This is separate from `tracing`-based diagnostics: tracing handles
//! human-readable operation logs, while this port captures one record per
//! state change (JSONL in the file adapter).

use serde_json::Value;

/// A structured ballot event for logging.
///
/// The adapter adds the `type` and `timestamp` fields when writing.
#[derive(Debug, Clone)]
pub struct BallotEvent {
    /// Event type identifier (e.g., "vote_recorded", "extension_granted").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl BallotEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging ballot events.
///
/// `log` is synchronous and infallible; a failed write must never fail the
/// operation that produced the event.
pub trait BallotEventLogger: Send + Sync {
    fn log(&self, event: BallotEvent);
}

/// No-op implementation for tests and when the event log is disabled.
pub struct NoBallotEventLogger;

impl BallotEventLogger for NoBallotEventLogger {
    fn log(&self, _event: BallotEvent) {}
}
