//! Audience-aware read model
//!
//! Under discrete voting, per-participant choices are stored (they back the
//! one-vote-per-participant rule) but only the owning participant may see
//! their own. Everyone else gets aggregate tallies.

use crate::core::ids::{ParticipantId, RequestId, ResolutionId};
use crate::extension::ExtensionRequest;
use crate::lifecycle::status::RequestStatus;
use crate::request::entities::{
    CalculationBase, MeetingType, Participant, Vote, VoteChoice, VotingRequest,
};
use crate::request::reminders::ReminderConfig;
use crate::tally::{RequestProgress, ResolutionTally, tally_request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who is reading
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum Audience {
    /// The organizer's console
    Administrator,
    /// One of the request's participants
    Participant(ParticipantId),
    /// Public summaries
    Public,
}

impl Audience {
    /// Whether this audience may see `participant`'s individual choices
    pub fn may_see_choices_of(&self, participant: &ParticipantId, discrete: bool) -> bool {
        match self {
            Audience::Participant(own) if own == participant => true,
            Audience::Administrator | Audience::Participant(_) => !discrete,
            Audience::Public => false,
        }
    }

    fn sees_contact_details(&self) -> bool {
        matches!(self, Audience::Administrator)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantView {
    pub id: ParticipantId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    pub voting_share: u8,
}

impl ParticipantView {
    fn of(participant: &Participant, audience: &Audience) -> Self {
        let contact = audience.sees_contact_details();
        Self {
            id: participant.id.clone(),
            name: participant.name.clone(),
            email: contact.then(|| participant.email.clone()),
            mobile: contact.then(|| participant.mobile.clone()),
            voting_share: participant.voting_share,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionView {
    pub id: ResolutionId,
    pub title: String,
    pub description: String,
    pub minimum_pass_percentage: u8,
    pub calculation_base: CalculationBase,
    /// Individual ballots this audience is allowed to see
    pub votes: Vec<Vote>,
    /// Whether some ballots were withheld from `votes`
    pub concealed: bool,
    /// The reader's own choice, when the reader is a participant who voted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub own_choice: Option<VoteChoice>,
    pub tally: ResolutionTally,
}

/// A voting request as one audience sees it at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestView {
    pub id: RequestId,
    pub title: String,
    pub entity_name: String,
    pub meeting_number: String,
    pub meeting_type: MeetingType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub effective_end_date: DateTime<Utc>,
    pub discrete_voting: bool,
    pub allow_extensions: bool,
    pub phase: RequestStatus,
    pub voting_open: bool,
    pub participants: Vec<ParticipantView>,
    pub resolutions: Vec<ResolutionView>,
    pub progress: RequestProgress,
    pub extensions: Vec<ExtensionRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<ReminderConfig>,
}

impl RequestView {
    pub fn build(request: &VotingRequest, audience: &Audience, now: DateTime<Utc>) -> Self {
        let tally = tally_request(request, now);
        let own = match audience {
            Audience::Participant(id) => Some(id),
            _ => None,
        };

        let resolutions = request
            .resolutions
            .iter()
            .zip(tally.resolutions)
            .map(|(resolution, tally)| {
                let votes: Vec<Vote> = resolution
                    .votes
                    .iter()
                    .filter(|vote| {
                        audience.may_see_choices_of(&vote.participant_id, request.discrete_voting)
                    })
                    .cloned()
                    .collect();
                ResolutionView {
                    id: resolution.id.clone(),
                    title: resolution.title.clone(),
                    description: resolution.description.clone(),
                    minimum_pass_percentage: resolution.minimum_pass_percentage,
                    calculation_base: resolution.calculation_base,
                    concealed: votes.len() < resolution.votes.len(),
                    votes,
                    own_choice: own
                        .and_then(|id| resolution.vote_of(id))
                        .map(|vote| vote.choice),
                    tally,
                }
            })
            .collect();

        Self {
            id: request.id.clone(),
            title: request.title.clone(),
            entity_name: request.entity_name.clone(),
            meeting_number: request.meeting_number.clone(),
            meeting_type: request.meeting_type,
            start_date: request.start_date,
            end_date: request.end_date,
            effective_end_date: request.effective_end_date(),
            discrete_voting: request.discrete_voting,
            allow_extensions: request.allow_extensions,
            phase: tally.phase,
            voting_open: request.is_voting_open(now),
            participants: request
                .participants
                .iter()
                .map(|participant| ParticipantView::of(participant, audience))
                .collect(),
            resolutions,
            progress: tally.progress,
            extensions: request.extensions.clone(),
            reminders: audience
                .sees_contact_details()
                .then(|| request.reminders.clone()),
        }
    }
}
