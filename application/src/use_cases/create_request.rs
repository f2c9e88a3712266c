//! Create Voting Request use case
//!
//! Builds a draft from submitted fields and stores it under a fresh id.

use crate::ports::ballot_events::{BallotEvent, BallotEventLogger, NoBallotEventLogger};
use crate::ports::clock::Clock;
use crate::ports::repository::VotingRequestRepository;
use crate::use_cases::error::BallotError;
use ballot_domain::{DraftDefaults, RequestDraft, VotingRequest};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Use case for creating a voting request in `draft`
pub struct CreateRequestUseCase<R: VotingRequestRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    defaults: DraftDefaults,
    event_logger: Arc<dyn BallotEventLogger>,
}

impl<R: VotingRequestRepository + 'static> CreateRequestUseCase<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            defaults: DraftDefaults::default(),
            event_logger: Arc::new(NoBallotEventLogger),
        }
    }

    /// Values applied to draft fields the submission leaves out
    pub fn with_defaults(mut self, defaults: DraftDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_event_logger(mut self, logger: Arc<dyn BallotEventLogger>) -> Self {
        self.event_logger = logger;
        self
    }

    pub async fn execute(&self, draft: RequestDraft) -> Result<VotingRequest, BallotError> {
        let id = self.repository.next_id();
        let request = draft.build(id, &self.defaults, self.clock.now())?;
        self.repository.insert(request.clone()).await?;

        info!(
            "Created voting request {} with {} participants and {} resolutions",
            request.id,
            request.participants.len(),
            request.resolutions.len()
        );
        self.event_logger.log(BallotEvent::new(
            "request_created",
            json!({
                "request_id": request.id,
                "title": request.title,
                "participants": request.participants.len(),
                "resolutions": request.resolutions.len(),
            }),
        ));

        Ok(request)
    }
}
