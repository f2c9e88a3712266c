//! Test doubles and fixtures for use case tests

use crate::ports::ballot_events::{BallotEvent, BallotEventLogger};
use crate::ports::clock::FixedClock;
use crate::ports::repository::{
    Admission, Mutation, RemovalGuard, RepositoryError, VotingRequestRepository,
};
use async_trait::async_trait;
use ballot_domain::{
    CalculationBase, DomainError, EntityKind, MeetingType, ParticipantDraft, ParticipantId,
    RequestDraft, RequestId, ResolutionDraft, ResolutionId, Vote, VoteChoice, VotingRequest,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().expect("valid RFC 3339 timestamp")
}

pub fn clock_at(timestamp: &str) -> Arc<FixedClock> {
    Arc::new(FixedClock::new(at(timestamp)))
}

/// Board meeting running 2026-03-01 to 2026-03-08, shares [25, 30, 20, 15, 10],
/// r1 at 51% of total_vote and r2 at 51% of votes_present
pub fn sample_draft() -> RequestDraft {
    let people = [
        ("Ada Lovelace", 25),
        ("Grace Hopper", 30),
        ("Edsger Dijkstra", 20),
        ("Barbara Liskov", 15),
        ("Donald Knuth", 10),
    ];
    RequestDraft {
        title: "Q1 board resolutions".to_string(),
        entity_name: "Acme Holdings".to_string(),
        meeting_number: "BM-2026-01".to_string(),
        meeting_type: MeetingType::BoardMeeting,
        start_date: at("2026-03-01T00:00:00Z"),
        end_date: at("2026-03-08T00:00:00Z"),
        discrete_voting: Some(false),
        allow_extensions: Some(true),
        equal_shares: false,
        participants: people
            .iter()
            .enumerate()
            .map(|(index, (name, share))| ParticipantDraft {
                email: format!("p{}@acme.test", index + 1),
                ..ParticipantDraft::new(*name, *share)
            })
            .collect(),
        resolutions: vec![
            ResolutionDraft::new("Approve annual budget")
                .with_threshold(51, CalculationBase::TotalVote),
            ResolutionDraft::new("Appoint auditor")
                .with_threshold(51, CalculationBase::VotesPresent),
        ],
        reminders: Default::default(),
    }
}

/// Single-mutex repository that keeps ballots inside the aggregate
#[derive(Default)]
pub struct MemoryRepository {
    requests: Mutex<HashMap<RequestId, VotingRequest>>,
    counter: AtomicUsize,
}

#[async_trait]
impl VotingRequestRepository for MemoryRepository {
    fn next_id(&self) -> RequestId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        RequestId::new(format!("req-{n}"))
    }

    async fn insert(&self, request: VotingRequest) -> Result<(), RepositoryError> {
        let mut requests = self.requests.lock().unwrap();
        if requests.contains_key(&request.id) {
            return Err(RepositoryError::Conflict(request.id));
        }
        requests.insert(request.id.clone(), request);
        Ok(())
    }

    async fn get(&self, id: &RequestId) -> Result<Option<VotingRequest>, RepositoryError> {
        Ok(self.requests.lock().unwrap().get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<VotingRequest>, RepositoryError> {
        Ok(self.requests.lock().unwrap().values().cloned().collect())
    }

    async fn update(
        &self,
        id: &RequestId,
        mutation: Mutation<'_>,
    ) -> Result<VotingRequest, RepositoryError> {
        let mut requests = self.requests.lock().unwrap();
        let stored = requests
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        let mut edited = stored.clone();
        mutation(&mut edited)?;
        *stored = edited.clone();
        Ok(edited)
    }

    async fn remove(
        &self,
        id: &RequestId,
        guard: RemovalGuard<'_>,
    ) -> Result<VotingRequest, RepositoryError> {
        let mut requests = self.requests.lock().unwrap();
        let stored = requests
            .get(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        guard(stored)?;
        requests
            .remove(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn append_vote(
        &self,
        request_id: &RequestId,
        resolution_id: &ResolutionId,
        participant_id: &ParticipantId,
        choice: VoteChoice,
        admit: Admission<'_>,
    ) -> Result<Vote, RepositoryError> {
        let mut requests = self.requests.lock().unwrap();
        let request = requests
            .get_mut(request_id)
            .ok_or_else(|| RepositoryError::NotFound(request_id.clone()))?;
        let voted_at = admit(&*request)?;

        let resolution = request
            .resolution_mut(resolution_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Resolution, resolution_id))?;
        if resolution.has_voted(participant_id) {
            return Err(DomainError::AlreadyVoted {
                resolution: resolution_id.clone(),
                participant: participant_id.clone(),
            }
            .into());
        }
        let vote = Vote::new(participant_id.clone(), choice, voted_at);
        resolution.votes.push(vote.clone());
        Ok(vote)
    }
}

/// Event logger that keeps everything it is given
#[derive(Default)]
pub struct RecordingEventLogger {
    events: Mutex<Vec<BallotEvent>>,
}

impl RecordingEventLogger {
    pub fn events(&self) -> Vec<BallotEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn types(&self) -> Vec<&'static str> {
        self.events().iter().map(|e| e.event_type).collect()
    }
}

impl BallotEventLogger for RecordingEventLogger {
    fn log(&self, event: BallotEvent) {
        self.events.lock().unwrap().push(event);
    }
}
