//! Manage Extensions use case
//!
//! Filing, granting and rejecting deadline extensions. Grants go through the
//! repository's serialized update path, so they cannot interleave with a
//! ballot's closure check.

use crate::ports::ballot_events::{BallotEvent, BallotEventLogger, NoBallotEventLogger};
use crate::ports::clock::Clock;
use crate::ports::repository::{RepositoryError, VotingRequestRepository};
use crate::use_cases::error::BallotError;
use ballot_domain::{
    DomainError, ExtensionId, ExtensionRequest, ParticipantId, RequestId, VotingRequest,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Use case for the deadline extension workflow
pub struct ManageExtensionsUseCase<R: VotingRequestRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    event_logger: Arc<dyn BallotEventLogger>,
}

impl<R: VotingRequestRepository + 'static> ManageExtensionsUseCase<R> {
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

    /// File an extension on behalf of a participant while voting is open
    pub async fn request(
        &self,
        request_id: &RequestId,
        participant_id: &ParticipantId,
        reason: impl Into<String>,
    ) -> Result<ExtensionRequest, BallotError> {
        let reason = reason.into();
        let clock = Arc::clone(&self.clock);
        let extension = self
            .mutate(request_id, move |request| {
                request
                    .request_extension(participant_id, reason, clock.now())
                    .cloned()
            })
            .await?;

        info!(
            "Participant {} requested extension {} on {}",
            participant_id, extension.id, request_id
        );
        self.event_logger.log(BallotEvent::new(
            "extension_requested",
            json!({
                "request_id": request_id,
                "extension_id": extension.id,
                "participant_id": participant_id,
                "reason": extension.reason,
            }),
        ));
        Ok(extension)
    }

    /// Grant a pending extension; the new deadline applies immediately
    pub async fn grant(
        &self,
        request_id: &RequestId,
        extension_id: &ExtensionId,
        new_end_date: DateTime<Utc>,
    ) -> Result<ExtensionRequest, BallotError> {
        let extension = self
            .mutate(request_id, move |request| {
                request.grant_extension(extension_id, new_end_date).cloned()
            })
            .await?;

        info!(
            "Granted extension {} on {} until {}",
            extension_id, request_id, new_end_date
        );
        self.event_logger.log(BallotEvent::new(
            "extension_granted",
            json!({
                "request_id": request_id,
                "extension_id": extension_id,
                "new_end_date": new_end_date,
            }),
        ));
        Ok(extension)
    }

    /// Reject a pending extension; the deadline stays where it is
    pub async fn reject(
        &self,
        request_id: &RequestId,
        extension_id: &ExtensionId,
    ) -> Result<ExtensionRequest, BallotError> {
        let extension = self
            .mutate(request_id, move |request| {
                request.reject_extension(extension_id).cloned()
            })
            .await?;

        info!("Rejected extension {} on {}", extension_id, request_id);
        self.event_logger.log(BallotEvent::new(
            "extension_rejected",
            json!({ "request_id": request_id, "extension_id": extension_id }),
        ));
        Ok(extension)
    }

    async fn mutate<F>(
        &self,
        request_id: &RequestId,
        edit: F,
    ) -> Result<ExtensionRequest, BallotError>
    where
        F: FnOnce(&mut VotingRequest) -> Result<ExtensionRequest, DomainError> + Send,
    {
        let mut touched = None;
        self.repository
            .update(
                request_id,
                Box::new(|request: &mut VotingRequest| {
                    touched = Some(edit(request)?);
                    Ok(())
                }),
            )
            .await?;

        touched.ok_or_else(|| {
            BallotError::from(RepositoryError::Storage(format!(
                "update of {} did not run",
                request_id
            )))
        })
    }
}
