//! Deadline extension workflow
//!
//! A participant files an [`ExtensionRequest`] while voting is open; an
//! administrator then grants it with a new end date or rejects it. A grant
//! takes effect through [`VotingRequest::effective_end_date`] on the very
//! next phase check. Only one unresolved extension may exist per request.

use crate::core::error::{DomainError, EntityKind, ExtensionRefusal};
use crate::core::ids::{ExtensionId, ParticipantId};
use crate::lifecycle::validation::ValidationIssue;
use crate::request::VotingRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A participant's request to move the voting deadline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionRequest {
    pub id: ExtensionId,
    pub participant_id: ParticipantId,
    pub requested_at: DateTime<Utc>,
    pub reason: String,
    pub resolved: bool,
    /// Set only when granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_end_date: Option<DateTime<Utc>>,
}

impl ExtensionRequest {
    pub fn is_granted(&self) -> bool {
        self.resolved && self.new_end_date.is_some()
    }

    pub fn is_rejected(&self) -> bool {
        self.resolved && self.new_end_date.is_none()
    }
}

impl VotingRequest {
    /// File a new extension request on behalf of a participant
    pub fn request_extension(
        &mut self,
        participant_id: &ParticipantId,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<&ExtensionRequest, DomainError> {
        if !self.allow_extensions {
            return Err(DomainError::ExtensionNotAllowed(ExtensionRefusal::Disabled));
        }
        if !self.is_voting_open(now) {
            return Err(DomainError::ExtensionNotAllowed(
                ExtensionRefusal::NotInProgress,
            ));
        }
        if !self.is_participant(participant_id) {
            return Err(DomainError::UnknownParticipant(participant_id.clone()));
        }
        if self.pending_extension().is_some() {
            return Err(DomainError::ExtensionNotAllowed(
                ExtensionRefusal::AlreadyPending,
            ));
        }

        let id = ExtensionId::sequential(self.extensions.len() + 1);
        self.extensions.push(ExtensionRequest {
            id,
            participant_id: participant_id.clone(),
            requested_at: now,
            reason: reason.into(),
            resolved: false,
            new_end_date: None,
        });

        let index = self.extensions.len() - 1;
        Ok(&self.extensions[index])
    }

    /// Grant a pending extension; `new_end_date` must be strictly after the
    /// current effective end date.
    pub fn grant_extension(
        &mut self,
        extension_id: &ExtensionId,
        new_end_date: DateTime<Utc>,
    ) -> Result<&ExtensionRequest, DomainError> {
        let deadline = self.effective_end_date();
        let index = self.unresolved_extension_index(extension_id)?;

        if new_end_date <= deadline {
            return Err(DomainError::Validation(
                ValidationIssue::ExtensionNotAfterDeadline {
                    requested: new_end_date,
                    deadline,
                },
            ));
        }

        let extension = &mut self.extensions[index];
        extension.resolved = true;
        extension.new_end_date = Some(new_end_date);
        Ok(&self.extensions[index])
    }

    /// Reject a pending extension; the deadline stays where it is
    pub fn reject_extension(
        &mut self,
        extension_id: &ExtensionId,
    ) -> Result<&ExtensionRequest, DomainError> {
        let index = self.unresolved_extension_index(extension_id)?;
        let extension = &mut self.extensions[index];
        extension.resolved = true;
        extension.new_end_date = None;
        Ok(&self.extensions[index])
    }

    pub fn extension(&self, extension_id: &ExtensionId) -> Option<&ExtensionRequest> {
        self.extensions.iter().find(|ext| &ext.id == extension_id)
    }

    fn unresolved_extension_index(&self, extension_id: &ExtensionId) -> Result<usize, DomainError> {
        let index = self
            .extensions
            .iter()
            .position(|ext| &ext.id == extension_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Extension, extension_id))?;

        if self.extensions[index].resolved {
            return Err(DomainError::ExtensionNotAllowed(
                ExtensionRefusal::AlreadyResolved,
            ));
        }
        Ok(index)
    }
}
