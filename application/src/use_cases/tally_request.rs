//! Tally Request use case
//!
//! Tallies are recomputed from a snapshot on every call. While a request is
//! `in_progress` the result is provisional; only a tally taken once the
//! request is `completed` is final.

use crate::ports::clock::Clock;
use crate::ports::repository::VotingRequestRepository;
use crate::use_cases::error::BallotError;
use crate::use_cases::query_requests::ensure_visible;
use ballot_domain::{
    Audience, DomainError, EntityKind, ParticipantId, RequestId, RequestTally, ResolutionId,
    VoteChoice, VotingRequest, tally_request,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A participant's own recorded choice on one resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnBallot {
    pub resolution_id: ResolutionId,
    pub resolution_title: String,
    pub choice: VoteChoice,
    pub voted_at: DateTime<Utc>,
}

/// Use case for tallies and participants' own ballots
pub struct TallyRequestUseCase<R: VotingRequestRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: VotingRequestRepository + 'static> TallyRequestUseCase<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Per-resolution tallies and progress as of now.
    ///
    /// Tallies are aggregates, so every audience that may read the request
    /// gets the same numbers.
    pub async fn tally(
        &self,
        id: &RequestId,
        audience: &Audience,
    ) -> Result<RequestTally, BallotError> {
        let request = self.load(id).await?;
        ensure_visible(&request, audience)?;

        let tally = tally_request(&request, self.clock.now());
        debug!(
            "Tallied {} as {} ({} resolutions)",
            id,
            tally.finality,
            tally.resolutions.len()
        );
        Ok(tally)
    }

    /// The participant's own ballots, in resolution order.
    ///
    /// Available under discrete voting too.
    pub async fn my_votes(
        &self,
        id: &RequestId,
        participant_id: &ParticipantId,
    ) -> Result<Vec<OwnBallot>, BallotError> {
        let request = self.load(id).await?;
        ensure_visible(&request, &Audience::Participant(participant_id.clone()))?;

        Ok(request
            .resolutions
            .iter()
            .filter_map(|resolution| {
                resolution.vote_of(participant_id).map(|vote| OwnBallot {
                    resolution_id: resolution.id.clone(),
                    resolution_title: resolution.title.clone(),
                    choice: vote.choice,
                    voted_at: vote.voted_at,
                })
            })
            .collect())
    }

    async fn load(&self, id: &RequestId) -> Result<VotingRequest, BallotError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Request, id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::FixedClock;
    use crate::test_support::{MemoryRepository, at, sample_draft};
    use crate::use_cases::cast_vote::{CastVoteInput, CastVoteUseCase};
    use ballot_domain::{DraftDefaults, Finality, Outcome};

    struct Fixture {
        clock: Arc<FixedClock>,
        votes: CastVoteUseCase<MemoryRepository>,
        use_case: TallyRequestUseCase<MemoryRepository>,
        id: RequestId,
    }

    async fn fixture(discrete: bool) -> Fixture {
        let repository = Arc::new(MemoryRepository::default());
        let clock = Arc::new(FixedClock::new(at("2026-03-02T00:00:00Z")));

        let id = repository.next_id();
        let mut draft = sample_draft();
        draft.discrete_voting = Some(discrete);
        let mut request = draft
            .build(id.clone(), &DraftDefaults::default(), at("2026-02-01T00:00:00Z"))
            .unwrap();
        request.publish(at("2026-02-01T00:00:00Z")).unwrap();
        repository.insert(request).await.unwrap();

        Fixture {
            votes: CastVoteUseCase::new(repository.clone(), clock.clone()),
            use_case: TallyRequestUseCase::new(repository, clock.clone()),
            clock,
            id,
        }
    }

    async fn vote(f: &Fixture, resolution: &str, participant: &str, choice: VoteChoice) {
        f.votes
            .execute(CastVoteInput::new(f.id.clone(), resolution, participant, choice))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_tally_is_provisional_until_completed() {
        let f = fixture(false).await;
        vote(&f, "r1", "p1", VoteChoice::Agree).await;
        vote(&f, "r1", "p2", VoteChoice::Agree).await;

        let tally = f.use_case.tally(&f.id, &Audience::Public).await.unwrap();
        assert_eq!(tally.finality, Finality::Provisional);
        assert_eq!(tally.resolutions[0].agree_share, 55);
        assert_eq!(tally.resolutions[0].final_outcome(), None);

        f.clock.set(at("2026-03-08T00:00:00Z"));
        let tally = f.use_case.tally(&f.id, &Audience::Public).await.unwrap();
        assert!(tally.is_final());
        assert_eq!(tally.resolutions[0].outcome, Outcome::Passed);
        assert_eq!(tally.resolutions[1].outcome, Outcome::Passed);
        assert_eq!(tally.progress.passed_resolutions, Some(2));
    }

    #[tokio::test]
    async fn test_votes_present_base_uses_present_share() {
        let f = fixture(false).await;
        vote(&f, "r2", "p1", VoteChoice::Disagree).await;
        vote(&f, "r2", "p2", VoteChoice::Abstain).await;
        vote(&f, "r2", "p3", VoteChoice::Agree).await;

        let tally = f.use_case.tally(&f.id, &Audience::Administrator).await.unwrap();
        let r2 = &tally.resolutions[1];
        assert_eq!(r2.present_share, 75);
        assert_eq!(r2.agree_share, 20);
        assert_eq!(r2.outcome, Outcome::Failed);
    }

    #[tokio::test]
    async fn test_my_votes_survive_discrete_voting() {
        let f = fixture(true).await;
        vote(&f, "r1", "p4", VoteChoice::Agree).await;
        vote(&f, "r2", "p4", VoteChoice::Abstain).await;
        vote(&f, "r1", "p5", VoteChoice::Disagree).await;

        let mine = f
            .use_case
            .my_votes(&f.id, &ParticipantId::new("p4"))
            .await
            .unwrap();
        let choices: Vec<VoteChoice> = mine.iter().map(|b| b.choice).collect();
        assert_eq!(choices, vec![VoteChoice::Agree, VoteChoice::Abstain]);
        assert_eq!(mine[0].resolution_id, ResolutionId::new("r1"));

        let error = f
            .use_case
            .my_votes(&f.id, &ParticipantId::new("p9"))
            .await
            .unwrap_err();
        assert!(matches!(
            error.domain(),
            Some(DomainError::UnknownParticipant(_))
        ));
    }
}
