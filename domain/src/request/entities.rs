//! Voting request aggregate
//!
//! A [`VotingRequest`] owns its participants, resolutions, recorded votes and
//! extension requests. Votes are append-only: once a [`Vote`] sits in a
//! resolution's list it is never updated or removed.

use crate::core::ids::{ParticipantId, RequestId, ResolutionId};
use crate::extension::ExtensionRequest;
use crate::lifecycle::status::LifecycleState;
use crate::request::reminders::ReminderConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of meeting a voting request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    BoardMeeting,
    AnnualMeeting,
    SpecialMeeting,
    CommitteeMeeting,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::BoardMeeting => "board_meeting",
            MeetingType::AnnualMeeting => "annual_meeting",
            MeetingType::SpecialMeeting => "special_meeting",
            MeetingType::CommitteeMeeting => "committee_meeting",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MeetingType::BoardMeeting => "Board Meeting",
            MeetingType::AnnualMeeting => "Annual Meeting",
            MeetingType::SpecialMeeting => "Special Meeting",
            MeetingType::CommitteeMeeting => "Committee Meeting",
        }
    }
}

impl std::fmt::Display for MeetingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Denominator a resolution's pass threshold is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CalculationBase {
    /// Shares of every participant of the request
    #[default]
    TotalVote,
    /// Shares of participants who voted on the resolution (abstentions included)
    VotesPresent,
}

impl CalculationBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationBase::TotalVote => "total_vote",
            CalculationBase::VotesPresent => "votes_present",
        }
    }
}

impl std::fmt::Display for CalculationBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CalculationBase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "total_vote" | "total" => Ok(CalculationBase::TotalVote),
            "votes_present" | "present" => Ok(CalculationBase::VotesPresent),
            other => Err(format!(
                "Unknown calculation base: {}. Valid: total_vote, votes_present",
                other
            )),
        }
    }
}

/// A participant's choice on one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Agree,
    Disagree,
    Abstain,
}

impl VoteChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::Agree => "agree",
            VoteChoice::Disagree => "disagree",
            VoteChoice::Abstain => "abstain",
        }
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoteChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "agree" | "yes" | "for" => Ok(VoteChoice::Agree),
            "disagree" | "no" | "against" => Ok(VoteChoice::Disagree),
            "abstain" => Ok(VoteChoice::Abstain),
            other => Err(format!(
                "Unknown vote choice: {}. Valid: agree, disagree, abstain",
                other
            )),
        }
    }
}

/// A recorded ballot. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub participant_id: ParticipantId,
    pub choice: VoteChoice,
    pub voted_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(participant_id: ParticipantId, choice: VoteChoice, voted_at: DateTime<Utc>) -> Self {
        Self {
            participant_id,
            choice,
            voted_at,
        }
    }
}

/// A member of the voting body with a fixed weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    /// Weight in percent points (0-100)
    pub voting_share: u8,
}

/// One motion put to the vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub id: ResolutionId,
    pub title: String,
    pub description: String,
    /// Agree percentage needed to pass (1-100)
    pub minimum_pass_percentage: u8,
    pub calculation_base: CalculationBase,
    #[serde(default)]
    pub votes: Vec<Vote>,
}

impl Resolution {
    /// The vote recorded for a participant, if any
    pub fn vote_of(&self, participant: &ParticipantId) -> Option<&Vote> {
        self.votes.iter().find(|v| &v.participant_id == participant)
    }

    pub fn has_voted(&self, participant: &ParticipantId) -> bool {
        self.vote_of(participant).is_some()
    }
}

/// The voting request aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingRequest {
    pub id: RequestId,
    pub title: String,
    pub entity_name: String,
    pub meeting_number: String,
    pub meeting_type: MeetingType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub discrete_voting: bool,
    pub allow_extensions: bool,
    /// Shares are derived with the equal allocation and re-derived whenever
    /// the participant list changes
    #[serde(default)]
    pub equal_shares: bool,
    /// Stored lifecycle flag; the observable status is derived from it and
    /// the dates (see [`VotingRequest::current_phase`]).
    #[serde(rename = "status")]
    pub lifecycle: LifecycleState,
    pub participants: Vec<Participant>,
    pub resolutions: Vec<Resolution>,
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub extensions: Vec<ExtensionRequest>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl VotingRequest {
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    pub fn is_participant(&self, id: &ParticipantId) -> bool {
        self.participant(id).is_some()
    }

    pub fn resolution(&self, id: &ResolutionId) -> Option<&Resolution> {
        self.resolutions.iter().find(|r| &r.id == id)
    }

    pub fn resolution_mut(&mut self, id: &ResolutionId) -> Option<&mut Resolution> {
        self.resolutions.iter_mut().find(|r| &r.id == id)
    }

    /// Sum of voting shares across all participants
    pub fn total_share(&self) -> u32 {
        self.participants.iter().map(|p| p.voting_share as u32).sum()
    }

    /// Total number of votes recorded across all resolutions
    pub fn vote_count(&self) -> usize {
        self.resolutions.iter().map(|r| r.votes.len()).sum()
    }

    /// Case-insensitive match against title, entity name and meeting number
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.title, &self.entity_name, &self.meeting_number]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
