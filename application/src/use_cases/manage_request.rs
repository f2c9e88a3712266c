//! Manage Voting Request use case
//!
//! Draft edits, publication, discarding and the manual review hooks. Each
//! operation runs as a single repository mutation, so a refused change
//! leaves the stored request untouched.

use crate::ports::ballot_events::{BallotEvent, BallotEventLogger, NoBallotEventLogger};
use crate::ports::clock::Clock;
use crate::ports::repository::VotingRequestRepository;
use crate::use_cases::error::BallotError;
use ballot_domain::{
    DomainError, DraftDefaults, RequestId, RequestPatch, RequestStatus, VotingRequest,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Use case for changing a stored voting request
pub struct ManageRequestUseCase<R: VotingRequestRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    defaults: DraftDefaults,
    event_logger: Arc<dyn BallotEventLogger>,
}

impl<R: VotingRequestRepository + 'static> ManageRequestUseCase<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            defaults: DraftDefaults::default(),
            event_logger: Arc::new(NoBallotEventLogger),
        }
    }

    pub fn with_defaults(mut self, defaults: DraftDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_event_logger(mut self, logger: Arc<dyn BallotEventLogger>) -> Self {
        self.event_logger = logger;
        self
    }

    /// Apply a partial update.
    ///
    /// Field edits require `draft`. `status: scheduled` publishes after the
    /// edits are applied; both land together or not at all. Any other
    /// status target is refused.
    pub async fn update(
        &self,
        id: &RequestId,
        patch: RequestPatch,
    ) -> Result<VotingRequest, BallotError> {
        let clock = Arc::clone(&self.clock);
        let defaults = self.defaults;
        let has_edits = patch.has_field_edits();
        let target = patch.status;

        let updated = self
            .repository
            .update(
                id,
                Box::new(move |request: &mut VotingRequest| {
                    let now = clock.now();
                    request.apply_patch(&patch, &defaults, now)?;
                    match patch.status {
                        None => Ok(()),
                        Some(RequestStatus::Scheduled) => request.publish(now).map(|_| ()),
                        Some(to) => Err(DomainError::InvalidStateTransition {
                            from: request.current_phase(now),
                            to,
                        }),
                    }
                }),
            )
            .await?;

        if has_edits {
            debug!("Updated draft fields of voting request {}", id);
            self.event_logger.log(BallotEvent::new(
                "request_updated",
                json!({ "request_id": id }),
            ));
        }
        if target.is_some() {
            self.log_published(&updated);
        }
        Ok(updated)
    }

    /// `draft → scheduled`
    pub async fn publish(&self, id: &RequestId) -> Result<VotingRequest, BallotError> {
        self.update(id, RequestPatch::publish()).await
    }

    /// Remove a request that is still a draft
    pub async fn discard(&self, id: &RequestId) -> Result<VotingRequest, BallotError> {
        let clock = Arc::clone(&self.clock);
        let removed = self
            .repository
            .remove(id, &move |request: &VotingRequest| {
                request.ensure_discardable(clock.now())
            })
            .await?;

        info!("Discarded draft voting request {}", id);
        self.event_logger.log(BallotEvent::new(
            "request_discarded",
            json!({ "request_id": id, "title": removed.title }),
        ));
        Ok(removed)
    }

    /// Escalate an `in_progress` or `completed` request to `review`
    pub async fn enter_review(
        &self,
        id: &RequestId,
        reason: impl Into<String>,
    ) -> Result<VotingRequest, BallotError> {
        let clock = Arc::clone(&self.clock);
        let reason = reason.into();
        let logged_reason = reason.clone();

        let updated = self
            .repository
            .update(
                id,
                Box::new(move |request: &mut VotingRequest| {
                    request.enter_review(reason, clock.now())
                }),
            )
            .await?;

        info!("Voting request {} entered review", id);
        self.event_logger.log(BallotEvent::new(
            "review_entered",
            json!({ "request_id": id, "reason": logged_reason }),
        ));
        Ok(updated)
    }

    /// Leave review and resume the date-derived status
    pub async fn exit_review(&self, id: &RequestId) -> Result<VotingRequest, BallotError> {
        let clock = Arc::clone(&self.clock);
        let updated = self
            .repository
            .update(
                id,
                Box::new(move |request: &mut VotingRequest| {
                    request.exit_review(clock.now()).map(|_| ())
                }),
            )
            .await?;

        let phase = updated.current_phase(self.clock.now());
        info!("Voting request {} left review as {}", id, phase);
        self.event_logger.log(BallotEvent::new(
            "review_exited",
            json!({ "request_id": id, "status": phase }),
        ));
        Ok(updated)
    }

    fn log_published(&self, request: &VotingRequest) {
        let phase = request.current_phase(self.clock.now());
        info!("Published voting request {} ({})", request.id, phase);
        self.event_logger.log(BallotEvent::new(
            "request_published",
            json!({
                "request_id": request.id,
                "status": phase,
                "start_date": request.start_date,
                "end_date": request.end_date,
            }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::FixedClock;
    use crate::test_support::{MemoryRepository, RecordingEventLogger, at, sample_draft};
    use ballot_domain::{EntityKind, LifecycleState, ValidationIssue};

    struct Fixture {
        repository: Arc<MemoryRepository>,
        clock: Arc<FixedClock>,
        logger: Arc<RecordingEventLogger>,
        use_case: ManageRequestUseCase<MemoryRepository>,
        id: RequestId,
    }

    async fn fixture() -> Fixture {
        let repository = Arc::new(MemoryRepository::default());
        let clock = Arc::new(FixedClock::new(at("2026-02-01T00:00:00Z")));
        let logger = Arc::new(RecordingEventLogger::default());
        let id = repository.next_id();
        let request = sample_draft()
            .build(id.clone(), &DraftDefaults::default(), clock.now())
            .unwrap();
        repository.insert(request).await.unwrap();

        let use_case = ManageRequestUseCase::new(repository.clone(), clock.clone())
            .with_event_logger(logger.clone());
        Fixture {
            repository,
            clock,
            logger,
            use_case,
            id,
        }
    }

    #[tokio::test]
    async fn test_publish_moves_draft_to_scheduled() {
        let f = fixture().await;
        let request = f.use_case.publish(&f.id).await.unwrap();

        assert_eq!(request.lifecycle, LifecycleState::Published);
        assert_eq!(request.current_phase(f.clock.now()), RequestStatus::Scheduled);
        assert_eq!(f.logger.types(), vec!["request_published"]);
    }

    #[tokio::test]
    async fn test_publish_rejects_share_mismatch_without_partial_apply() {
        let f = fixture().await;
        f.repository
            .update(
                &f.id,
                Box::new(|request: &mut VotingRequest| {
                    request.participants[0].voting_share = 20;
                    Ok(())
                }),
            )
            .await
            .unwrap();

        let error = f.use_case.publish(&f.id).await.unwrap_err();
        assert_eq!(
            error.domain(),
            Some(&DomainError::Validation(ValidationIssue::ShareSumMismatch {
                total: 95
            }))
        );
        let stored = f.repository.get(&f.id).await.unwrap().unwrap();
        assert!(stored.lifecycle.is_draft());
        assert!(f.logger.types().is_empty());
    }

    #[tokio::test]
    async fn test_republish_is_invalid_transition() {
        let f = fixture().await;
        f.use_case.publish(&f.id).await.unwrap();

        let error = f.use_case.publish(&f.id).await.unwrap_err();
        assert_eq!(
            error.domain(),
            Some(&DomainError::InvalidStateTransition {
                from: RequestStatus::Scheduled,
                to: RequestStatus::Scheduled,
            })
        );
    }

    #[tokio::test]
    async fn test_field_edits_with_publish_land_together() {
        let f = fixture().await;
        let patch = RequestPatch {
            title: Some("Q1 board resolutions (final)".to_string()),
            ..RequestPatch::publish()
        };

        let request = f.use_case.update(&f.id, patch).await.unwrap();
        assert_eq!(request.title, "Q1 board resolutions (final)");
        assert!(!request.lifecycle.is_draft());
        assert_eq!(
            f.logger.types(),
            vec!["request_updated", "request_published"]
        );
    }

    #[tokio::test]
    async fn test_failed_publish_discards_field_edits() {
        let f = fixture().await;
        let patch = RequestPatch {
            title: Some("Renamed".to_string()),
            end_date: Some(at("2026-01-15T00:00:00Z")),
            start_date: Some(at("2026-01-10T00:00:00Z")),
            ..RequestPatch::publish()
        };

        let error = f.use_case.update(&f.id, patch).await.unwrap_err();
        assert!(matches!(
            error.domain(),
            Some(DomainError::Validation(ValidationIssue::EndDateInPast { .. }))
        ));
        let stored = f.repository.get(&f.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Q1 board resolutions");
    }

    #[tokio::test]
    async fn test_field_edits_after_publish_are_refused() {
        let f = fixture().await;
        f.use_case.publish(&f.id).await.unwrap();

        let patch = RequestPatch {
            title: Some("Too late".to_string()),
            ..RequestPatch::default()
        };
        let error = f.use_case.update(&f.id, patch).await.unwrap_err();
        assert_eq!(
            error.domain(),
            Some(&DomainError::NotEditable(RequestStatus::Scheduled))
        );
    }

    #[tokio::test]
    async fn test_status_patch_other_than_scheduled_is_refused() {
        let f = fixture().await;
        let patch = RequestPatch {
            status: Some(RequestStatus::Completed),
            ..RequestPatch::default()
        };
        let error = f.use_case.update(&f.id, patch).await.unwrap_err();
        assert_eq!(
            error.domain(),
            Some(&DomainError::InvalidStateTransition {
                from: RequestStatus::Draft,
                to: RequestStatus::Completed,
            })
        );
    }

    #[tokio::test]
    async fn test_discard_only_drafts() {
        let f = fixture().await;
        f.use_case.discard(&f.id).await.unwrap();
        assert!(f.repository.get(&f.id).await.unwrap().is_none());
        assert_eq!(f.logger.types(), vec!["request_discarded"]);

        let error = f.use_case.discard(&f.id).await.unwrap_err();
        assert!(matches!(
            error.domain(),
            Some(DomainError::NotFound {
                kind: EntityKind::Request,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_discard_published_request_is_refused() {
        let f = fixture().await;
        f.use_case.publish(&f.id).await.unwrap();

        let error = f.use_case.discard(&f.id).await.unwrap_err();
        assert_eq!(
            error.domain(),
            Some(&DomainError::InvalidStateTransition {
                from: RequestStatus::Scheduled,
                to: RequestStatus::Draft,
            })
        );
        assert!(f.repository.get(&f.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_review_round_trip_from_in_progress() {
        let f = fixture().await;
        f.use_case.publish(&f.id).await.unwrap();

        let error = f.use_case.enter_review(&f.id, "audit").await.unwrap_err();
        assert!(matches!(
            error.domain(),
            Some(DomainError::InvalidStateTransition {
                from: RequestStatus::Scheduled,
                ..
            })
        ));

        f.clock.set(at("2026-03-03T00:00:00Z"));
        let request = f.use_case.enter_review(&f.id, "audit").await.unwrap();
        assert_eq!(request.current_phase(f.clock.now()), RequestStatus::Review);

        let request = f.use_case.exit_review(&f.id).await.unwrap();
        assert_eq!(
            request.current_phase(f.clock.now()),
            RequestStatus::InProgress
        );
        assert_eq!(
            f.logger.types(),
            vec!["request_published", "review_entered", "review_exited"]
        );
    }

    #[tokio::test]
    async fn test_exit_review_when_not_in_review_is_refused() {
        let f = fixture().await;
        f.use_case.publish(&f.id).await.unwrap();
        f.clock.set(at("2026-03-03T00:00:00Z"));

        let error = f.use_case.exit_review(&f.id).await.unwrap_err();
        assert!(matches!(
            error.domain(),
            Some(DomainError::InvalidStateTransition { .. })
        ));
    }
}
