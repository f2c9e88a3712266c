//! Voting request repository port
//!
//! The repository owns every stored request. Anything that must be decided
//! atomically with a write (the ballot uniqueness check, the closure check,
//! draft-only edits) is passed in as a closure and evaluated inside the
//! adapter's critical section, never before it.

use async_trait::async_trait;
use ballot_domain::{
    DomainError, ParticipantId, RequestId, ResolutionId, Vote, VoteChoice, VotingRequest,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during repository operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    /// A precondition evaluated inside the critical section refused the write
    #[error(transparent)]
    Rejected(#[from] DomainError),

    #[error("Voting request not found: {0}")]
    NotFound(RequestId),

    #[error("Voting request already exists: {0}")]
    Conflict(RequestId),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Edit applied to a full snapshot of a request. The store keeps the edited
/// snapshot only if the closure returns `Ok`.
pub type Mutation<'a> =
    Box<dyn FnOnce(&mut VotingRequest) -> Result<(), DomainError> + Send + 'a>;

/// Ballot admission check. Runs inside the critical section that performs
/// the insert and returns the instant to stamp on the vote.
pub type Admission<'a> =
    &'a (dyn Fn(&VotingRequest) -> Result<DateTime<Utc>, DomainError> + Sync);

/// Guard evaluated before a request is removed
pub type RemovalGuard<'a> = &'a (dyn Fn(&VotingRequest) -> Result<(), DomainError> + Sync);

/// Storage for voting requests and their ballots
///
/// Implementations must make [`append_vote`](Self::append_vote) atomic per
/// `(resolution, participant)` key and must serialize
/// [`update`](Self::update) against concurrent ballot admissions of the same
/// request, so an extension grant or review entry cannot interleave with a
/// closure check.
#[async_trait]
pub trait VotingRequestRepository: Send + Sync {
    /// Allocate an id for a new request
    fn next_id(&self) -> RequestId;

    /// Store a new request
    async fn insert(&self, request: VotingRequest) -> Result<(), RepositoryError>;

    /// Snapshot of one request with its ballots in the order they were recorded
    async fn get(&self, id: &RequestId) -> Result<Option<VotingRequest>, RepositoryError>;

    /// Snapshots of every stored request
    async fn list(&self) -> Result<Vec<VotingRequest>, RepositoryError>;

    /// Apply `mutation` to a request and return the stored result
    async fn update(
        &self,
        id: &RequestId,
        mutation: Mutation<'_>,
    ) -> Result<VotingRequest, RepositoryError>;

    /// Remove a request if `guard` allows it and return what was removed
    async fn remove(
        &self,
        id: &RequestId,
        guard: RemovalGuard<'_>,
    ) -> Result<VotingRequest, RepositoryError>;

    /// Check-and-insert one ballot.
    ///
    /// `admit` is called with the current snapshot immediately before the
    /// insert; a second ballot for the same key fails with
    /// [`DomainError::AlreadyVoted`] and leaves the ledger unchanged.
    async fn append_vote(
        &self,
        request_id: &RequestId,
        resolution_id: &ResolutionId,
        participant_id: &ParticipantId,
        choice: VoteChoice,
        admit: Admission<'_>,
    ) -> Result<Vote, RepositoryError>;
}
