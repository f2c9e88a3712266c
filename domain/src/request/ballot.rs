//! Ballot admission rules
//!
//! Stores that keep votes inside the aggregate call [`VotingRequest::record_vote`].
//! Stores with their own per-key ledger call [`VotingRequest::admit_vote`]
//! inside the critical section that performs the insert and enforce
//! uniqueness themselves.

use crate::core::error::{DomainError, EntityKind};
use crate::core::ids::{ParticipantId, ResolutionId};
use crate::request::entities::{Vote, VoteChoice, VotingRequest};
use chrono::{DateTime, Utc};

impl VotingRequest {
    /// Check everything about a ballot except uniqueness.
    ///
    /// Order: voting window, participant membership, resolution lookup.
    pub fn admit_vote(
        &self,
        resolution_id: &ResolutionId,
        participant_id: &ParticipantId,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.voting_window(now).map_err(DomainError::VotingWindow)?;

        if !self.is_participant(participant_id) {
            return Err(DomainError::UnknownParticipant(participant_id.clone()));
        }
        if self.resolution(resolution_id).is_none() {
            return Err(DomainError::not_found(EntityKind::Resolution, resolution_id));
        }
        Ok(())
    }

    /// Admit and append a ballot to the aggregate's own vote list
    pub fn record_vote(
        &mut self,
        resolution_id: &ResolutionId,
        participant_id: &ParticipantId,
        choice: VoteChoice,
        now: DateTime<Utc>,
    ) -> Result<Vote, DomainError> {
        self.admit_vote(resolution_id, participant_id, now)?;

        let resolution = self
            .resolution_mut(resolution_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Resolution, resolution_id))?;
        if resolution.has_voted(participant_id) {
            return Err(DomainError::AlreadyVoted {
                resolution: resolution_id.clone(),
                participant: participant_id.clone(),
            });
        }

        let vote = Vote::new(participant_id.clone(), choice, now);
        resolution.votes.push(vote.clone());
        Ok(vote)
    }
}
