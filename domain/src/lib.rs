//! Domain layer for resolution-ballot
//!
//! This crate contains the voting request aggregate and the rules that
//! govern it. It has no I/O and no notion of storage.
//!
//! # Core Concepts
//!
//! ## Lifecycle
//!
//! A request is stored as `draft`, `published` or `review`. Its observable
//! status (`draft → scheduled → in_progress → completed`, plus `review`) is
//! derived from the clock and the stored dates on every read, so nothing has
//! to tick in the background.
//!
//! ## Ballots
//!
//! Each participant casts at most one immutable vote per resolution while
//! the voting window is open.
//!
//! ## Tally
//!
//! A resolution passes when the agreeing share reaches its minimum pass
//! percentage of either all shares (`total_vote`) or the shares of those who
//! voted (`votes_present`). Outcomes are provisional until the request is
//! completed.

pub mod config;
pub mod core;
pub mod extension;
pub mod lifecycle;
pub mod request;
pub mod tally;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use crate::core::{
    error::{DomainError, EntityKind, ExtensionRefusal, WindowReason},
    ids::{ExtensionId, ParticipantId, RequestId, ResolutionId},
};
pub use extension::ExtensionRequest;
pub use lifecycle::{LifecycleState, RequestStatus, ValidationIssue};
pub use request::{
    Audience, CalculationBase, DraftDefaults, MeetingType, Participant, ParticipantDraft,
    ReminderAudience, ReminderConfig, ReminderFrequency, RequestDraft, RequestPatch, RequestView,
    Resolution, ResolutionDraft, ResolutionView, Vote, VoteChoice, VotingRequest,
};
pub use tally::{
    Finality, Outcome, RequestProgress, RequestTally, ResolutionTally, allocate_equal_shares,
    tally_request, tally_resolution,
};
