//! Draft input and patch types
//!
//! These mirror the persisted request schema (camelCase JSON) but leave ids,
//! lifecycle and bookkeeping to the engine. Omitted per-resolution settings
//! and flags fall back to [`DraftDefaults`].

use crate::core::error::DomainError;
use crate::core::ids::{ParticipantId, RequestId, ResolutionId};
use crate::lifecycle::status::{LifecycleState, RequestStatus};
use crate::lifecycle::validation::validate_structure;
use crate::request::entities::{
    CalculationBase, MeetingType, Participant, Resolution, VotingRequest,
};
use crate::request::reminders::ReminderConfig;
use crate::tally::shares::allocate_equal_shares;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback values for fields a draft may omit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftDefaults {
    pub minimum_pass_percentage: u8,
    pub calculation_base: CalculationBase,
    pub discrete_voting: bool,
    pub allow_extensions: bool,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        Self {
            minimum_pass_percentage: 51,
            calculation_base: CalculationBase::TotalVote,
            discrete_voting: false,
            allow_extensions: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDraft {
    #[serde(default)]
    pub id: Option<ParticipantId>,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub voting_share: u8,
}

impl ParticipantDraft {
    pub fn new(name: impl Into<String>, voting_share: u8) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: String::new(),
            mobile: String::new(),
            voting_share,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDraft {
    #[serde(default)]
    pub id: Option<ResolutionId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub minimum_pass_percentage: Option<u8>,
    #[serde(default)]
    pub calculation_base: Option<CalculationBase>,
}

impl ResolutionDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            minimum_pass_percentage: None,
            calculation_base: None,
        }
    }

    pub fn with_threshold(mut self, percentage: u8, base: CalculationBase) -> Self {
        self.minimum_pass_percentage = Some(percentage);
        self.calculation_base = Some(base);
        self
    }
}

/// Input for creating a voting request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDraft {
    pub title: String,
    pub entity_name: String,
    pub meeting_number: String,
    pub meeting_type: MeetingType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub discrete_voting: Option<bool>,
    #[serde(default)]
    pub allow_extensions: Option<bool>,
    /// Derive shares with the equal allocation instead of using the
    /// participants' `votingShare` values
    #[serde(default)]
    pub equal_shares: bool,
    #[serde(default)]
    pub participants: Vec<ParticipantDraft>,
    #[serde(default)]
    pub resolutions: Vec<ResolutionDraft>,
    #[serde(default)]
    pub reminders: ReminderConfig,
}

impl RequestDraft {
    /// Build the stored aggregate in `draft` state.
    ///
    /// Runs structural validation; the share total is only enforced at
    /// publish time.
    pub fn build(
        self,
        id: RequestId,
        defaults: &DraftDefaults,
        now: DateTime<Utc>,
    ) -> Result<VotingRequest, DomainError> {
        let participants = build_participants(self.participants, self.equal_shares);
        let resolutions = build_resolutions(self.resolutions, defaults);

        let request = VotingRequest {
            id,
            title: self.title,
            entity_name: self.entity_name,
            meeting_number: self.meeting_number,
            meeting_type: self.meeting_type,
            start_date: self.start_date,
            end_date: self.end_date,
            discrete_voting: self.discrete_voting.unwrap_or(defaults.discrete_voting),
            allow_extensions: self.allow_extensions.unwrap_or(defaults.allow_extensions),
            equal_shares: self.equal_shares,
            lifecycle: LifecycleState::Draft,
            participants,
            resolutions,
            reminders: self.reminders,
            extensions: Vec::new(),
            created_at: now,
            published_at: None,
        };

        validate_structure(&request)?;
        Ok(request)
    }
}

/// Partial update of a voting request
///
/// Field edits apply only to drafts. `status` is a lifecycle request:
/// `scheduled` publishes, anything else is refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestPatch {
    pub title: Option<String>,
    pub entity_name: Option<String>,
    pub meeting_number: Option<String>,
    pub meeting_type: Option<MeetingType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub discrete_voting: Option<bool>,
    pub allow_extensions: Option<bool>,
    pub equal_shares: Option<bool>,
    pub participants: Option<Vec<ParticipantDraft>>,
    pub resolutions: Option<Vec<ResolutionDraft>>,
    pub reminders: Option<ReminderConfig>,
    pub status: Option<RequestStatus>,
}

impl RequestPatch {
    /// Whether the patch touches any field besides `status`
    pub fn has_field_edits(&self) -> bool {
        *self
            != Self {
                status: self.status,
                ..Self::default()
            }
    }

    pub fn publish() -> Self {
        Self {
            status: Some(RequestStatus::Scheduled),
            ..Self::default()
        }
    }
}

impl VotingRequest {
    /// Apply the field edits of a patch. All-or-nothing: on error the
    /// request is left as it was.
    pub fn apply_patch(
        &mut self,
        patch: &RequestPatch,
        defaults: &DraftDefaults,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if !patch.has_field_edits() {
            return Ok(());
        }
        self.ensure_editable(now)?;

        let mut edited = self.clone();
        if let Some(title) = &patch.title {
            edited.title = title.clone();
        }
        if let Some(entity_name) = &patch.entity_name {
            edited.entity_name = entity_name.clone();
        }
        if let Some(meeting_number) = &patch.meeting_number {
            edited.meeting_number = meeting_number.clone();
        }
        if let Some(meeting_type) = patch.meeting_type {
            edited.meeting_type = meeting_type;
        }
        if let Some(start_date) = patch.start_date {
            edited.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            edited.end_date = end_date;
        }
        if let Some(discrete_voting) = patch.discrete_voting {
            edited.discrete_voting = discrete_voting;
        }
        if let Some(allow_extensions) = patch.allow_extensions {
            edited.allow_extensions = allow_extensions;
        }
        if let Some(reminders) = &patch.reminders {
            edited.reminders = reminders.clone();
        }
        if let Some(equal_shares) = patch.equal_shares {
            edited.equal_shares = equal_shares;
        }
        if let Some(participants) = &patch.participants {
            edited.participants = build_participants(participants.clone(), edited.equal_shares);
        } else if patch.equal_shares == Some(true) {
            let shares = allocate_equal_shares(edited.participants.len());
            for (participant, share) in edited.participants.iter_mut().zip(shares) {
                participant.voting_share = share;
            }
        }
        if let Some(resolutions) = &patch.resolutions {
            edited.resolutions = build_resolutions(resolutions.clone(), defaults);
        }

        validate_structure(&edited)?;
        *self = edited;
        Ok(())
    }
}

fn build_participants(drafts: Vec<ParticipantDraft>, equal_shares: bool) -> Vec<Participant> {
    let shares = equal_shares.then(|| allocate_equal_shares(drafts.len()));

    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| Participant {
            id: draft.id.unwrap_or_else(|| ParticipantId::positional(index)),
            name: draft.name,
            email: draft.email,
            mobile: draft.mobile,
            voting_share: shares
                .as_ref()
                .map_or(draft.voting_share, |shares| shares[index]),
        })
        .collect()
}

fn build_resolutions(drafts: Vec<ResolutionDraft>, defaults: &DraftDefaults) -> Vec<Resolution> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| Resolution {
            id: draft.id.unwrap_or_else(|| ResolutionId::positional(index)),
            title: draft.title,
            description: draft.description,
            minimum_pass_percentage: draft
                .minimum_pass_percentage
                .unwrap_or(defaults.minimum_pass_percentage),
            calculation_base: draft.calculation_base.unwrap_or(defaults.calculation_base),
            votes: Vec::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::validation::ValidationIssue;
    use crate::test_support::{at, sample_draft};

    #[test]
    fn test_build_assigns_positional_ids_and_defaults() {
        let request = sample_draft()
            .build("req-1".into(), &DraftDefaults::default(), at("2026-02-01T00:00:00Z"))
            .unwrap();

        assert_eq!(request.id.as_str(), "req-1");
        assert!(request.lifecycle.is_draft());
        let ids: Vec<_> = request.participants.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3", "p4", "p5"]);
        assert_eq!(request.resolutions[1].id.as_str(), "r2");
        assert_eq!(request.resolutions[1].minimum_pass_percentage, 51);
        assert_eq!(
            request.resolutions[1].calculation_base,
            CalculationBase::TotalVote
        );
    }

    #[test]
    fn test_build_keeps_explicit_ids() {
        let mut draft = sample_draft();
        draft.participants[0].id = Some("alice".into());
        let request = draft
            .build("req-1".into(), &DraftDefaults::default(), at("2026-02-01T00:00:00Z"))
            .unwrap();
        assert_eq!(request.participants[0].id.as_str(), "alice");
        assert_eq!(request.participants[1].id.as_str(), "p2");
    }

    #[test]
    fn test_build_with_equal_shares() {
        let mut draft = sample_draft();
        draft.participants.truncate(3);
        draft.equal_shares = true;
        let request = draft
            .build("req-1".into(), &DraftDefaults::default(), at("2026-02-01T00:00:00Z"))
            .unwrap();
        let shares: Vec<_> = request.participants.iter().map(|p| p.voting_share).collect();
        assert_eq!(shares, vec![34, 33, 33]);
    }

    #[test]
    fn test_build_rejects_structural_errors() {
        let mut draft = sample_draft();
        draft.resolutions[0].minimum_pass_percentage = Some(0);
        let error = draft
            .build("req-1".into(), &DraftDefaults::default(), at("2026-02-01T00:00:00Z"))
            .unwrap_err();
        assert!(matches!(
            error,
            DomainError::Validation(ValidationIssue::PassPercentageOutOfRange { .. })
        ));
    }

    #[test]
    fn test_draft_parses_wire_schema() {
        let json = r#"{
            "title": "Q2 board resolutions",
            "entityName": "Acme Holdings",
            "meetingNumber": "BM-2026-02",
            "meetingType": "board_meeting",
            "startDate": "2026-03-01T00:00:00Z",
            "endDate": "2026-03-08T00:00:00Z",
            "discreteVoting": true,
            "participants": [{"name": "Ada", "email": "ada@acme.test", "mobile": "+100", "votingShare": 100}],
            "resolutions": [{"title": "Approve budget", "minimumPassPercentage": 67, "calculationBase": "votes_present"}],
            "reminders": {"sendSMS": false, "sendEmail": true, "sendTo": "all_participants", "frequency": "daily", "startBefore": 2}
        }"#;
        let draft: RequestDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.discrete_voting, Some(true));
        assert_eq!(draft.allow_extensions, None);
        assert_eq!(draft.resolutions[0].minimum_pass_percentage, Some(67));
        assert_eq!(draft.reminders.start_before, 2);
    }

    #[test]
    fn test_patch_applies_to_draft() {
        let mut request = sample_draft()
            .build("req-1".into(), &DraftDefaults::default(), at("2026-02-01T00:00:00Z"))
            .unwrap();
        let patch = RequestPatch {
            title: Some("Renamed".to_string()),
            equal_shares: Some(true),
            ..RequestPatch::default()
        };

        request
            .apply_patch(&patch, &DraftDefaults::default(), at("2026-02-02T00:00:00Z"))
            .unwrap();
        assert_eq!(request.title, "Renamed");
        assert!(request.participants.iter().all(|p| p.voting_share == 20));
    }

    #[test]
    fn test_equal_shares_follow_participant_patch() {
        let mut draft = sample_draft();
        draft.participants.truncate(3);
        draft.equal_shares = true;
        let mut request = draft
            .build("req-1".into(), &DraftDefaults::default(), at("2026-02-01T00:00:00Z"))
            .unwrap();
        assert!(request.equal_shares);

        let patch = RequestPatch {
            participants: Some(
                ["Ada", "Grace", "Edsger", "Barbara"]
                    .into_iter()
                    .map(|name| ParticipantDraft::new(name, 0))
                    .collect(),
            ),
            ..RequestPatch::default()
        };
        request
            .apply_patch(&patch, &DraftDefaults::default(), at("2026-02-02T00:00:00Z"))
            .unwrap();

        let shares: Vec<_> = request.participants.iter().map(|p| p.voting_share).collect();
        assert_eq!(shares, vec![25, 25, 25, 25]);
        assert!(request.publish(at("2026-02-02T00:00:00Z")).is_ok());
    }

    #[test]
    fn test_equal_shares_can_be_switched_off() {
        let mut draft = sample_draft();
        draft.participants.truncate(2);
        draft.equal_shares = true;
        let mut request = draft
            .build("req-1".into(), &DraftDefaults::default(), at("2026-02-01T00:00:00Z"))
            .unwrap();

        let patch = RequestPatch {
            equal_shares: Some(false),
            participants: Some(vec![
                ParticipantDraft::new("Ada", 70),
                ParticipantDraft::new("Grace", 30),
            ]),
            ..RequestPatch::default()
        };
        request
            .apply_patch(&patch, &DraftDefaults::default(), at("2026-02-02T00:00:00Z"))
            .unwrap();

        assert!(!request.equal_shares);
        let shares: Vec<_> = request.participants.iter().map(|p| p.voting_share).collect();
        assert_eq!(shares, vec![70, 30]);
    }

    #[test]
    fn test_stored_request_without_equal_shares_flag_loads() {
        let request = sample_draft()
            .build("req-1".into(), &DraftDefaults::default(), at("2026-02-01T00:00:00Z"))
            .unwrap();
        let mut value = serde_json::to_value(&request).unwrap();
        value.as_object_mut().unwrap().remove("equalShares");

        let loaded: VotingRequest = serde_json::from_value(value).unwrap();
        assert!(!loaded.equal_shares);
    }

    #[test]
    fn test_patch_is_all_or_nothing() {
        let mut request = sample_draft()
            .build("req-1".into(), &DraftDefaults::default(), at("2026-02-01T00:00:00Z"))
            .unwrap();
        let before = request.clone();
        let patch = RequestPatch {
            title: Some("Renamed".to_string()),
            end_date: Some(at("2026-01-01T00:00:00Z")),
            ..RequestPatch::default()
        };

        assert!(
            request
                .apply_patch(&patch, &DraftDefaults::default(), at("2026-02-02T00:00:00Z"))
                .is_err()
        );
        assert_eq!(request, before);
    }

    #[test]
    fn test_status_only_patch_has_no_field_edits() {
        assert!(!RequestPatch::publish().has_field_edits());
        assert!(!RequestPatch::default().has_field_edits());
        let patch = RequestPatch {
            allow_extensions: Some(true),
            ..RequestPatch::publish()
        };
        assert!(patch.has_field_edits());
    }
}
