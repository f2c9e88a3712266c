//! Cast Vote use case
//!
//! Admission (window, membership, resolution) is evaluated by the repository
//! inside the same critical section as the uniqueness check and the insert,
//! with the clock read there too. A ballot cannot slip in across the
//! closure boundary.

use crate::ports::ballot_events::{BallotEvent, BallotEventLogger, NoBallotEventLogger};
use crate::ports::clock::Clock;
use crate::ports::repository::VotingRequestRepository;
use crate::use_cases::error::BallotError;
use ballot_domain::{
    DomainError, ParticipantId, RequestId, ResolutionId, Vote, VoteChoice, VotingRequest,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Input for the CastVote use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastVoteInput {
    pub request_id: RequestId,
    pub resolution_id: ResolutionId,
    pub participant_id: ParticipantId,
    pub choice: VoteChoice,
}

impl CastVoteInput {
    pub fn new(
        request_id: impl Into<RequestId>,
        resolution_id: impl Into<ResolutionId>,
        participant_id: impl Into<ParticipantId>,
        choice: VoteChoice,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            resolution_id: resolution_id.into(),
            participant_id: participant_id.into(),
            choice,
        }
    }
}

/// Use case for recording one ballot
pub struct CastVoteUseCase<R: VotingRequestRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    event_logger: Arc<dyn BallotEventLogger>,
}

impl<R: VotingRequestRepository + 'static> CastVoteUseCase<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            event_logger: Arc::new(NoBallotEventLogger),
        }
    }

    pub fn with_event_logger(mut self, logger: Arc<dyn BallotEventLogger>) -> Self {
        self.event_logger = logger;
        self
    }

    pub async fn execute(&self, input: CastVoteInput) -> Result<Vote, BallotError> {
        let discrete = AtomicBool::new(false);
        let admit = |request: &VotingRequest| -> Result<DateTime<Utc>, DomainError> {
            discrete.store(request.discrete_voting, Ordering::Relaxed);
            let now = self.clock.now();
            request.admit_vote(&input.resolution_id, &input.participant_id, now)?;
            Ok(now)
        };

        let result = self
            .repository
            .append_vote(
                &input.request_id,
                &input.resolution_id,
                &input.participant_id,
                input.choice,
                &admit,
            )
            .await
            .map_err(BallotError::from);

        match &result {
            Ok(vote) => {
                info!(
                    "Recorded vote of {} on {}/{}",
                    input.participant_id, input.request_id, input.resolution_id
                );
                let mut payload = json!({
                    "request_id": input.request_id,
                    "resolution_id": input.resolution_id,
                    "participant_id": input.participant_id,
                    "voted_at": vote.voted_at,
                });
                if !discrete.load(Ordering::Relaxed) {
                    payload["choice"] = json!(vote.choice);
                }
                self.event_logger
                    .log(BallotEvent::new("vote_recorded", payload));
            }
            Err(error) => {
                debug!(
                    "Rejected vote of {} on {}/{}: {}",
                    input.participant_id, input.request_id, input.resolution_id, error
                );
                self.event_logger.log(BallotEvent::new(
                    "vote_rejected",
                    json!({
                        "request_id": input.request_id,
                        "resolution_id": input.resolution_id,
                        "participant_id": input.participant_id,
                        "code": error.code(),
                        "error": error.to_string(),
                    }),
                ));
            }
        }

        result
    }
}
