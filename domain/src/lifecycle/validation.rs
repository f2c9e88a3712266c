//! Request invariants
//!
//! Two levels of checking:
//!
//! - [`validate_structure`] runs on every draft write (create and patch) and
//!   rejects values that can never become valid: percentages out of range,
//!   inverted dates, duplicate ids, blank required fields.
//! - [`validate_for_publish`] runs when a request leaves `draft` and adds the
//!   invariants a draft may temporarily violate, most importantly that the
//!   voting shares sum to exactly 100.
//!
//! Both return the first violated invariant and never adjust the request.

use crate::core::ids::{ParticipantId, ResolutionId};
use crate::request::VotingRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Total voting share a published request must carry
pub const REQUIRED_SHARE_TOTAL: u32 = 100;

/// A single violated invariant
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", content = "detail", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("at least one participant is required")]
    NoParticipants,

    #[error("at least one resolution is required")]
    NoResolutions,

    #[error("participant id {0} is used more than once")]
    DuplicateParticipant(ParticipantId),

    #[error("resolution id {0} is used more than once")]
    DuplicateResolution(ResolutionId),

    #[error("voting share {share} of participant {participant} is outside 0-100")]
    ShareOutOfRange { participant: ParticipantId, share: u8 },

    #[error("voting shares sum to {total}, expected 100")]
    ShareSumMismatch { total: u32 },

    #[error("minimum pass percentage {value} of resolution {resolution} is outside 1-100")]
    PassPercentageOutOfRange { resolution: ResolutionId, value: u8 },

    #[error("end date {end} must be after start date {start}")]
    EndNotAfterStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("end date {end} has already passed")]
    EndDateInPast { end: DateTime<Utc> },

    #[error("new end date {requested} must be after the current deadline {deadline}")]
    ExtensionNotAfterDeadline {
        requested: DateTime<Utc>,
        deadline: DateTime<Utc>,
    },
}

/// Invariants every stored request satisfies, drafts included
pub fn validate_structure(request: &VotingRequest) -> Result<(), ValidationIssue> {
    require_text("title", &request.title)?;
    require_text("entityName", &request.entity_name)?;
    require_text("meetingNumber", &request.meeting_number)?;

    let mut seen = HashSet::new();
    for participant in &request.participants {
        require_text("participants[].name", &participant.name)?;
        if !seen.insert(&participant.id) {
            return Err(ValidationIssue::DuplicateParticipant(participant.id.clone()));
        }
        if participant.voting_share as u32 > REQUIRED_SHARE_TOTAL {
            return Err(ValidationIssue::ShareOutOfRange {
                participant: participant.id.clone(),
                share: participant.voting_share,
            });
        }
    }

    let mut seen = HashSet::new();
    for resolution in &request.resolutions {
        require_text("resolutions[].title", &resolution.title)?;
        if !seen.insert(&resolution.id) {
            return Err(ValidationIssue::DuplicateResolution(resolution.id.clone()));
        }
        if !(1..=100).contains(&resolution.minimum_pass_percentage) {
            return Err(ValidationIssue::PassPercentageOutOfRange {
                resolution: resolution.id.clone(),
                value: resolution.minimum_pass_percentage,
            });
        }
    }

    if request.end_date <= request.start_date {
        return Err(ValidationIssue::EndNotAfterStart {
            start: request.start_date,
            end: request.end_date,
        });
    }

    Ok(())
}

/// Invariants checked when a request leaves `draft`
pub fn validate_for_publish(
    request: &VotingRequest,
    now: DateTime<Utc>,
) -> Result<(), ValidationIssue> {
    validate_structure(request)?;

    if request.participants.is_empty() {
        return Err(ValidationIssue::NoParticipants);
    }
    if request.resolutions.is_empty() {
        return Err(ValidationIssue::NoResolutions);
    }

    let total = request.total_share();
    if total != REQUIRED_SHARE_TOTAL {
        return Err(ValidationIssue::ShareSumMismatch { total });
    }

    if request.end_date <= now {
        return Err(ValidationIssue::EndDateInPast {
            end: request.end_date,
        });
    }

    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<(), ValidationIssue> {
    if value.trim().is_empty() {
        Err(ValidationIssue::MissingField(field.to_string()))
    } else {
        Ok(())
    }
}
