//! In-memory voting request store with a per-key ballot ledger
//!
//! Each request keeps its fields (with empty vote lists) behind an `RwLock`
//! and its ballots in a `DashMap` keyed by `(resolution, participant)`.
//!
//! - A ballot insert holds the request's read lock plus the ledger entry for
//!   its key, so inserts on different keys proceed in parallel and the
//!   admission check runs inside the same critical section as the insert.
//! - Updates (publication, review, extension grants) hold the write lock,
//!   which excludes every in-flight ballot of that request.

use async_trait::async_trait;
use ballot_application::ports::repository::{
    Admission, Mutation, RemovalGuard, RepositoryError, VotingRequestRepository,
};
use ballot_domain::{
    DomainError, ParticipantId, RequestId, ResolutionId, Vote, VoteChoice, VotingRequest,
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, trace};
use uuid::Uuid;

type BallotKey = (ResolutionId, ParticipantId);

#[derive(Debug, Clone)]
struct Ballot {
    sequence: u64,
    vote: Vote,
}

/// One stored request
#[derive(Debug)]
struct StoredRequest {
    /// Request fields; every resolution's vote list is kept empty
    header: RwLock<VotingRequest>,
    ballots: DashMap<BallotKey, Ballot>,
    sequence: AtomicU64,
}

impl StoredRequest {
    fn new(mut request: VotingRequest) -> Self {
        let ballots = DashMap::new();
        let mut sequence = 0;
        for resolution in &mut request.resolutions {
            for vote in resolution.votes.drain(..) {
                let key = (resolution.id.clone(), vote.participant_id.clone());
                ballots.insert(key, Ballot { sequence, vote });
                sequence += 1;
            }
        }
        Self {
            header: RwLock::new(request),
            ballots,
            sequence: AtomicU64::new(sequence),
        }
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Header plus ballots, each resolution's votes in insertion order
    fn assemble(&self, header: &VotingRequest) -> VotingRequest {
        let mut by_resolution: HashMap<ResolutionId, Vec<Ballot>> = HashMap::new();
        for entry in self.ballots.iter() {
            by_resolution
                .entry(entry.key().0.clone())
                .or_default()
                .push(entry.value().clone());
        }

        let mut request = header.clone();
        for resolution in &mut request.resolutions {
            if let Some(mut ballots) = by_resolution.remove(&resolution.id) {
                ballots.sort_by_key(|ballot| ballot.sequence);
                resolution.votes = ballots.into_iter().map(|ballot| ballot.vote).collect();
            }
        }
        request
    }

    /// Store an edited snapshot. Caller holds the header write lock.
    fn replace(&self, header: &mut VotingRequest, mut snapshot: VotingRequest) {
        let mut ledger = Vec::new();
        for resolution in &mut snapshot.resolutions {
            for vote in resolution.votes.drain(..) {
                let key = (resolution.id.clone(), vote.participant_id.clone());
                let sequence = self
                    .ballots
                    .get(&key)
                    .map(|ballot| ballot.sequence)
                    .unwrap_or_else(|| self.next_sequence());
                ledger.push((key, Ballot { sequence, vote }));
            }
        }

        self.ballots.clear();
        for (key, ballot) in ledger {
            self.ballots.insert(key, ballot);
        }
        *header = snapshot;
    }
}

fn poisoned<T>(_: PoisonError<T>) -> RepositoryError {
    RepositoryError::Storage("request lock poisoned".to_string())
}

/// Concurrent in-memory repository
#[derive(Debug, Default)]
pub struct InMemoryVotingRequestRepository {
    requests: DashMap<RequestId, Arc<StoredRequest>>,
}

impl InMemoryVotingRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Drop every stored request and replace them with `requests`
    pub(crate) fn reset(&self, requests: Vec<VotingRequest>) {
        self.requests.clear();
        for request in requests {
            self.requests
                .insert(request.id.clone(), Arc::new(StoredRequest::new(request)));
        }
    }

    /// Clone the handle so the map shard is released before any lock is taken
    fn stored(&self, id: &RequestId) -> Result<Arc<StoredRequest>, RepositoryError> {
        self.requests
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    fn snapshot(stored: &StoredRequest) -> Result<VotingRequest, RepositoryError> {
        let header = stored.header.read().map_err(poisoned)?;
        Ok(stored.assemble(&header))
    }
}

#[async_trait]
impl VotingRequestRepository for InMemoryVotingRequestRepository {
    fn next_id(&self) -> RequestId {
        RequestId::new(Uuid::new_v4().to_string())
    }

    async fn insert(&self, request: VotingRequest) -> Result<(), RepositoryError> {
        match self.requests.entry(request.id.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict(request.id)),
            Entry::Vacant(slot) => {
                debug!("Storing voting request {}", request.id);
                slot.insert(Arc::new(StoredRequest::new(request)));
                Ok(())
            }
        }
    }

    async fn get(&self, id: &RequestId) -> Result<Option<VotingRequest>, RepositoryError> {
        match self.stored(id) {
            Ok(stored) => Self::snapshot(&stored).map(Some),
            Err(RepositoryError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list(&self) -> Result<Vec<VotingRequest>, RepositoryError> {
        let handles: Vec<Arc<StoredRequest>> = self
            .requests
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        handles
            .iter()
            .map(|stored| Self::snapshot(stored))
            .collect()
    }

    async fn update(
        &self,
        id: &RequestId,
        mutation: Mutation<'_>,
    ) -> Result<VotingRequest, RepositoryError> {
        let stored = self.stored(id)?;
        let mut header = stored.header.write().map_err(poisoned)?;

        let mut snapshot = stored.assemble(&header);
        mutation(&mut snapshot)?;
        stored.replace(&mut header, snapshot.clone());
        trace!("Updated voting request {}", id);
        Ok(snapshot)
    }

    async fn remove(
        &self,
        id: &RequestId,
        guard: RemovalGuard<'_>,
    ) -> Result<VotingRequest, RepositoryError> {
        let stored = self.stored(id)?;
        let header = stored.header.write().map_err(poisoned)?;
        let snapshot = stored.assemble(&header);
        guard(&snapshot)?;

        self.requests
            .remove(id)
            .map(|_| snapshot)
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
        let stored = self.stored(request_id)?;
        let header = stored.header.read().map_err(poisoned)?;
        let request: &VotingRequest = &header;

        match stored
            .ballots
            .entry((resolution_id.clone(), participant_id.clone()))
        {
            Entry::Occupied(_) => {
                admit(request)?;
                Err(DomainError::AlreadyVoted {
                    resolution: resolution_id.clone(),
                    participant: participant_id.clone(),
                }
                .into())
            }
            Entry::Vacant(slot) => {
                let voted_at = admit(request)?;
                let vote = Vote::new(participant_id.clone(), choice, voted_at);
                slot.insert(Ballot {
                    sequence: stored.next_sequence(),
                    vote: vote.clone(),
                });
                Ok(vote)
            }
        }
    }
}
