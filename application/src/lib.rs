//! Application layer for resolution-ballot
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use ports::{
    ballot_events::{BallotEvent, BallotEventLogger, NoBallotEventLogger},
    clock::{Clock, FixedClock, SystemClock},
    repository::{Admission, Mutation, RemovalGuard, RepositoryError, VotingRequestRepository},
};
pub use use_cases::cast_vote::{CastVoteInput, CastVoteUseCase};
pub use use_cases::create_request::CreateRequestUseCase;
pub use use_cases::error::BallotError;
pub use use_cases::manage_extensions::ManageExtensionsUseCase;
pub use use_cases::manage_request::ManageRequestUseCase;
pub use use_cases::query_requests::{
    QueryRequestsUseCase, RequestFilter, RequestSummary, VotingStats,
};
pub use use_cases::tally_request::{OwnBallot, TallyRequestUseCase};
