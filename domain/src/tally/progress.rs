//! Request-level tally and progress statistics

use super::calculator::{ResolutionTally, tally_resolution};
use super::{Finality, Outcome};
use crate::core::ids::{ParticipantId, RequestId};
use crate::lifecycle::status::RequestStatus;
use crate::request::VotingRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Progress counters for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestProgress {
    /// Distinct participants with at least one vote on any resolution
    pub voted_participants: usize,
    pub total_participants: usize,
    /// Resolutions whose final outcome is `Passed`; `None` until the request
    /// is completed
    pub passed_resolutions: Option<usize>,
    pub total_resolutions: usize,
}

impl RequestProgress {
    /// Share of participants who have voted, in percent
    pub fn turnout_percentage(&self) -> f64 {
        if self.total_participants == 0 {
            0.0
        } else {
            self.voted_participants as f64 / self.total_participants as f64 * 100.0
        }
    }
}

/// Tally of every resolution of a request at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTally {
    pub request_id: RequestId,
    pub phase: RequestStatus,
    pub finality: Finality,
    pub computed_at: DateTime<Utc>,
    pub resolutions: Vec<ResolutionTally>,
    pub progress: RequestProgress,
}

impl RequestTally {
    pub fn is_final(&self) -> bool {
        self.finality == Finality::Final
    }
}

/// Tally all resolutions of `request` as of `now`
pub fn tally_request(request: &VotingRequest, now: DateTime<Utc>) -> RequestTally {
    let phase = request.current_phase(now);
    let finality = request.finality(now);

    let resolutions: Vec<ResolutionTally> = request
        .resolutions
        .iter()
        .map(|resolution| tally_resolution(resolution, &request.participants, finality))
        .collect();

    let progress = progress_of(request, &resolutions, finality);

    RequestTally {
        request_id: request.id.clone(),
        phase,
        finality,
        computed_at: now,
        resolutions,
        progress,
    }
}

fn progress_of(
    request: &VotingRequest,
    tallies: &[ResolutionTally],
    finality: Finality,
) -> RequestProgress {
    let voted: HashSet<&ParticipantId> = request
        .resolutions
        .iter()
        .flat_map(|resolution| resolution.votes.iter().map(|vote| &vote.participant_id))
        .filter(|id| request.is_participant(id))
        .collect();

    let passed_resolutions = (finality == Finality::Final).then(|| {
        tallies
            .iter()
            .filter(|tally| tally.final_outcome() == Some(Outcome::Passed))
            .count()
    });

    RequestProgress {
        voted_participants: voted.len(),
        total_participants: request.participants.len(),
        passed_resolutions,
        total_resolutions: request.resolutions.len(),
    }
}
