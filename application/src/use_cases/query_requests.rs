//! Query use cases: single request views, filtered listings and statistics
//!
//! Phases are derived from the clock on every read, so a listing taken at
//! different instants can report different statuses for the same request.

use crate::ports::clock::Clock;
use crate::ports::repository::VotingRequestRepository;
use crate::use_cases::error::BallotError;
use ballot_domain::{
    Audience, DomainError, EntityKind, MeetingType, RequestId, RequestStatus, RequestView,
    VotingRequest, tally_request,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Filter for listing requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFilter {
    /// Matched against the derived phase
    pub status: Option<RequestStatus>,
    /// Case-insensitive text matched against title, entity name and meeting number
    pub search: Option<String>,
}

impl RequestFilter {
    pub fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    fn matches(&self, request: &VotingRequest, phase: RequestStatus) -> bool {
        self.status.is_none_or(|status| status == phase)
            && self
                .search
                .as_deref()
                .is_none_or(|needle| request.matches_search(needle))
    }
}

/// One row of a request listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub id: RequestId,
    pub title: String,
    pub entity_name: String,
    pub meeting_number: String,
    pub meeting_type: MeetingType,
    pub phase: RequestStatus,
    pub start_date: DateTime<Utc>,
    pub effective_end_date: DateTime<Utc>,
    pub participants: usize,
    pub resolutions: usize,
    pub voted_participants: usize,
    pub pending_extension: bool,
}

impl RequestSummary {
    fn of(request: &VotingRequest, now: DateTime<Utc>) -> Self {
        let tally = tally_request(request, now);
        Self {
            id: request.id.clone(),
            title: request.title.clone(),
            entity_name: request.entity_name.clone(),
            meeting_number: request.meeting_number.clone(),
            meeting_type: request.meeting_type,
            phase: tally.phase,
            start_date: request.start_date,
            effective_end_date: request.effective_end_date(),
            participants: request.participants.len(),
            resolutions: request.resolutions.len(),
            voted_participants: tally.progress.voted_participants,
            pending_extension: request.pending_extension().is_some(),
        }
    }
}

/// Aggregate counts by derived phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingStats {
    pub draft: usize,
    pub scheduled: usize,
    /// Requests currently accepting (or about to resume accepting) votes
    pub in_progress: usize,
    pub completed: usize,
    pub review: usize,
    pub total: usize,
    /// Ballots recorded across every request
    pub votes: usize,
    pub computed_at: Option<DateTime<Utc>>,
}

impl VotingStats {
    fn count(&mut self, phase: RequestStatus) {
        let slot = match phase {
            RequestStatus::Draft => &mut self.draft,
            RequestStatus::Scheduled => &mut self.scheduled,
            RequestStatus::InProgress => &mut self.in_progress,
            RequestStatus::Completed => &mut self.completed,
            RequestStatus::Review => &mut self.review,
        };
        *slot += 1;
        self.total += 1;
    }
}

/// Check that `audience` may read `request` at all.
///
/// Drafts are only visible to administrators; participants must belong to
/// the request.
pub(crate) fn ensure_visible(
    request: &VotingRequest,
    audience: &Audience,
) -> Result<(), DomainError> {
    match audience {
        Audience::Administrator => Ok(()),
        _ if request.lifecycle.is_draft() => {
            Err(DomainError::not_found(EntityKind::Request, &request.id))
        }
        Audience::Participant(id) if !request.is_participant(id) => {
            Err(DomainError::UnknownParticipant(id.clone()))
        }
        _ => Ok(()),
    }
}

/// Use case for reading voting requests
pub struct QueryRequestsUseCase<R: VotingRequestRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: VotingRequestRepository + 'static> QueryRequestsUseCase<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// A request with its computed phase, as `audience` may see it
    pub async fn get(
        &self,
        id: &RequestId,
        audience: &Audience,
    ) -> Result<RequestView, BallotError> {
        let request = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Request, id))?;
        ensure_visible(&request, audience)?;
        Ok(RequestView::build(&request, audience, self.clock.now()))
    }

    /// Requests matching `filter`, ordered by start date
    pub async fn list(&self, filter: &RequestFilter) -> Result<Vec<RequestSummary>, BallotError> {
        let now = self.clock.now();
        let mut requests = self.repository.list().await?;
        requests.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });

        let summaries: Vec<RequestSummary> = requests
            .iter()
            .filter(|request| filter.matches(request, request.current_phase(now)))
            .map(|request| RequestSummary::of(request, now))
            .collect();
        debug!("Listed {} voting requests", summaries.len());
        Ok(summaries)
    }

    /// Counts by derived phase plus the number of recorded ballots
    pub async fn stats(&self) -> Result<VotingStats, BallotError> {
        let now = self.clock.now();
        let requests = self.repository.list().await?;

        let mut stats = VotingStats {
            computed_at: Some(now),
            ..VotingStats::default()
        };
        for request in &requests {
            stats.count(request.current_phase(now));
            stats.votes += request.vote_count();
        }
        Ok(stats)
    }
}
