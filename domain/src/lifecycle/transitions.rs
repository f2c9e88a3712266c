//! Lifecycle operations on the request aggregate
//!
//! These are the only places the stored [`LifecycleState`] changes. Each
//! operation validates first and mutates last, so a failed call leaves the
//! request untouched.

use crate::core::error::DomainError;
use crate::lifecycle::status::{LifecycleState, RequestStatus};
use crate::lifecycle::validation::validate_for_publish;
use crate::request::VotingRequest;
use chrono::{DateTime, Utc};

impl VotingRequest {
    /// `draft → scheduled`
    ///
    /// Returns the status observed right after publishing, which is
    /// `in_progress` when the start date has already been reached.
    pub fn publish(&mut self, now: DateTime<Utc>) -> Result<RequestStatus, DomainError> {
        if !self.lifecycle.is_draft() {
            return Err(DomainError::InvalidStateTransition {
                from: self.current_phase(now),
                to: RequestStatus::Scheduled,
            });
        }

        validate_for_publish(self, now)?;

        self.lifecycle = LifecycleState::Published;
        self.published_at = Some(now);
        Ok(self.current_phase(now))
    }

    /// Manual escalation from `in_progress` or `completed`
    pub fn enter_review(
        &mut self,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let from = self.current_phase(now);
        if !from.can_transition_to(RequestStatus::Review) {
            return Err(DomainError::InvalidStateTransition {
                from,
                to: RequestStatus::Review,
            });
        }

        self.lifecycle = LifecycleState::Review {
            entered_from: from,
            reason: reason.into(),
            entered_at: now,
        };
        Ok(())
    }

    /// Leave review and resume date-driven status
    ///
    /// A request reviewed from `completed` returns to `completed`. A request
    /// reviewed from `in_progress` returns to `in_progress`, or to
    /// `completed` when its deadline passed during the review.
    pub fn exit_review(&mut self, now: DateTime<Utc>) -> Result<RequestStatus, DomainError> {
        if !self.lifecycle.is_review() {
            return Err(DomainError::InvalidStateTransition {
                from: self.current_phase(now),
                to: self.date_phase(now),
            });
        }

        self.lifecycle = LifecycleState::Published;
        Ok(self.date_phase(now))
    }

    /// Field edits are only allowed while the request is a draft
    pub fn ensure_editable(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.lifecycle.is_draft() {
            Ok(())
        } else {
            Err(DomainError::NotEditable(self.current_phase(now)))
        }
    }

    /// Drafts may be discarded; anything published is kept
    pub fn ensure_discardable(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.lifecycle.is_draft() {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition {
                from: self.current_phase(now),
                to: RequestStatus::Draft,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::validation::ValidationIssue;
    use crate::test_support::{at, draft_request, published_request};

    #[test]
    fn test_publish_moves_draft_to_scheduled() {
        let mut request = draft_request();
        let status = request.publish(at("2026-02-01T00:00:00Z")).unwrap();

        assert_eq!(status, RequestStatus::Scheduled);
        assert_eq!(request.lifecycle, LifecycleState::Published);
        assert_eq!(request.published_at, Some(at("2026-02-01T00:00:00Z")));
    }

    #[test]
    fn test_publish_after_start_is_immediately_in_progress() {
        let mut request = draft_request();
        let status = request.publish(at("2026-03-02T00:00:00Z")).unwrap();
        assert_eq!(status, RequestStatus::InProgress);
    }

    #[test]
    fn test_publish_failure_leaves_draft_untouched() {
        let mut request = draft_request();
        request.participants[4].voting_share = 5;
        let before = request.clone();

        let error = request.publish(at("2026-02-01T00:00:00Z")).unwrap_err();
        assert_eq!(
            error,
            DomainError::Validation(ValidationIssue::ShareSumMismatch { total: 95 })
        );
        assert_eq!(request, before);
    }

    #[test]
    fn test_republish_is_invalid_transition() {
        let mut request = published_request();
        let error = request.publish(at("2026-03-02T00:00:00Z")).unwrap_err();
        assert_eq!(
            error,
            DomainError::InvalidStateTransition {
                from: RequestStatus::InProgress,
                to: RequestStatus::Scheduled,
            }
        );
    }

    #[test]
    fn test_review_round_trip_from_in_progress() {
        let mut request = published_request();
        let now = at("2026-03-03T00:00:00Z");

        request.enter_review("disputed proxy", now).unwrap();
        assert_eq!(request.current_phase(now), RequestStatus::Review);

        let resumed = request.exit_review(now).unwrap();
        assert_eq!(resumed, RequestStatus::InProgress);
        assert_eq!(request.current_phase(now), RequestStatus::InProgress);
    }

    #[test]
    fn test_review_from_completed_returns_to_completed() {
        let mut request = published_request();
        let now = at("2026-03-09T00:00:00Z");

        request.enter_review("recount", now).unwrap();
        assert!(matches!(
            request.lifecycle,
            LifecycleState::Review {
                entered_from: RequestStatus::Completed,
                ..
            }
        ));
        assert_eq!(request.exit_review(now).unwrap(), RequestStatus::Completed);
    }

    #[test]
    fn test_review_not_allowed_before_start() {
        let mut request = published_request();
        let error = request
            .enter_review("too early", at("2026-02-20T00:00:00Z"))
            .unwrap_err();
        assert_eq!(
            error,
            DomainError::InvalidStateTransition {
                from: RequestStatus::Scheduled,
                to: RequestStatus::Review,
            }
        );

        let mut draft = draft_request();
        assert!(draft.enter_review("nope", at("2026-03-02T00:00:00Z")).is_err());
    }

    #[test]
    fn test_exit_review_requires_review() {
        let mut request = published_request();
        assert!(request.exit_review(at("2026-03-02T00:00:00Z")).is_err());
    }

    #[test]
    fn test_editable_and_discardable_only_as_draft() {
        let now = at("2026-03-02T00:00:00Z");
        assert!(draft_request().ensure_editable(now).is_ok());
        assert!(draft_request().ensure_discardable(now).is_ok());

        let published = published_request();
        assert_eq!(
            published.ensure_editable(now),
            Err(DomainError::NotEditable(RequestStatus::InProgress))
        );
        assert!(published.ensure_discardable(now).is_err());
    }
}
