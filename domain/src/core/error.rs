//! Domain error types

use crate::core::ids::{ParticipantId, ResolutionId};
use crate::lifecycle::status::RequestStatus;
use crate::lifecycle::validation::ValidationIssue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain-level errors
///
/// Every variant is reported to the caller as-is; nothing here is retried
/// or corrected internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(ValidationIssue),

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Participant {0} is not part of this voting request")]
    UnknownParticipant(ParticipantId),

    #[error("Participant {participant} has already voted on resolution {resolution}")]
    AlreadyVoted {
        resolution: ResolutionId,
        participant: ParticipantId,
    },

    #[error("Voting window is not open: {0}")]
    VotingWindow(WindowReason),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("Voting request is {0} and can no longer be edited")]
    NotEditable(RequestStatus),

    #[error("Extension not allowed: {0}")]
    ExtensionNotAllowed(ExtensionRefusal),
}

impl DomainError {
    pub fn not_found(kind: EntityKind, id: impl std::fmt::Display) -> Self {
        DomainError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Check if this error is a validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }

    /// Stable machine-readable code for the error class
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation_error",
            DomainError::NotFound { .. } => "not_found",
            DomainError::UnknownParticipant(_) => "unknown_participant",
            DomainError::AlreadyVoted { .. } => "already_voted",
            DomainError::VotingWindow(_) => "voting_window",
            DomainError::InvalidStateTransition { .. } => "invalid_state_transition",
            DomainError::NotEditable(_) => "not_editable",
            DomainError::ExtensionNotAllowed(_) => "extension_not_allowed",
        }
    }
}

impl From<ValidationIssue> for DomainError {
    fn from(issue: ValidationIssue) -> Self {
        DomainError::Validation(issue)
    }
}

/// Kind of entity a lookup failed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Request,
    Resolution,
    Extension,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Request => write!(f, "Voting request"),
            EntityKind::Resolution => write!(f, "Resolution"),
            EntityKind::Extension => write!(f, "Extension request"),
        }
    }
}

/// Why a ballot was refused by the voting window check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowReason {
    /// The request is a draft or its start date has not been reached
    NotYetOpen,
    /// The effective end date has passed
    AlreadyClosed,
    /// The request is held in manual review
    UnderReview,
}

impl std::fmt::Display for WindowReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowReason::NotYetOpen => write!(f, "voting has not started yet"),
            WindowReason::AlreadyClosed => write!(f, "voting has already closed"),
            WindowReason::UnderReview => write!(f, "the request is under review"),
        }
    }
}

/// Why an extension request or decision was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionRefusal {
    /// `allowExtensions` is false on the request
    Disabled,
    /// The request is not currently accepting votes
    NotInProgress,
    /// Another extension request is still unresolved
    AlreadyPending,
    /// The extension request was already granted or rejected
    AlreadyResolved,
}

impl std::fmt::Display for ExtensionRefusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtensionRefusal::Disabled => write!(f, "extensions are disabled for this request"),
            ExtensionRefusal::NotInProgress => write!(f, "the request is not in progress"),
            ExtensionRefusal::AlreadyPending => {
                write!(f, "another extension request is still pending")
            }
            ExtensionRefusal::AlreadyResolved => {
                write!(f, "the extension request has already been resolved")
            }
        }
    }
}
