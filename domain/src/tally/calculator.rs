//! Per-resolution tally
//!
//! Pure functions over a snapshot of the ledger. Shares are whole percent
//! points, so the pass decision is made in integer arithmetic
//! (`agree * 100 >= threshold * denominator`); the floating-point percentage
//! is for display only.

use super::{Finality, Outcome};
use crate::core::ids::{ParticipantId, ResolutionId};
use crate::request::entities::{CalculationBase, Participant, Resolution, VoteChoice};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregated result of one resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionTally {
    pub resolution_id: ResolutionId,
    pub title: String,
    pub minimum_pass_percentage: u8,
    pub calculation_base: CalculationBase,
    pub agree_share: u32,
    pub disagree_share: u32,
    pub abstain_share: u32,
    /// Shares of everyone who voted, abstentions included
    pub present_share: u32,
    /// Shares of every participant of the request
    pub total_share: u32,
    /// `total_share` or `present_share`, per the calculation base
    pub denominator: u32,
    /// `None` when the denominator is zero
    pub agree_percentage: Option<f64>,
    pub outcome: Outcome,
    pub finality: Finality,
    /// Participants who voted on this resolution
    pub voters: usize,
    pub eligible_voters: usize,
}

impl ResolutionTally {
    /// Every eligible participant has voted
    pub fn is_fully_voted(&self) -> bool {
        self.eligible_voters > 0 && self.voters == self.eligible_voters
    }

    /// Outcome that counts toward the passed-resolutions statistic
    pub fn final_outcome(&self) -> Option<Outcome> {
        match self.finality {
            Finality::Final => Some(self.outcome),
            Finality::Provisional => None,
        }
    }
}

/// Tally a single resolution against the request's participants.
///
/// Votes from ids that are not in `participants` carry no weight.
pub fn tally_resolution(
    resolution: &Resolution,
    participants: &[Participant],
    finality: Finality,
) -> ResolutionTally {
    let shares: HashMap<&ParticipantId, u32> = participants
        .iter()
        .map(|p| (&p.id, p.voting_share as u32))
        .collect();

    let mut agree_share = 0;
    let mut disagree_share = 0;
    let mut abstain_share = 0;
    let mut voters = 0;

    for vote in &resolution.votes {
        let Some(&share) = shares.get(&vote.participant_id) else {
            continue;
        };
        voters += 1;
        match vote.choice {
            VoteChoice::Agree => agree_share += share,
            VoteChoice::Disagree => disagree_share += share,
            VoteChoice::Abstain => abstain_share += share,
        }
    }

    let present_share = agree_share + disagree_share + abstain_share;
    let total_share: u32 = shares.values().sum();
    let denominator = match resolution.calculation_base {
        CalculationBase::TotalVote => total_share,
        CalculationBase::VotesPresent => present_share,
    };

    let (agree_percentage, outcome) = if denominator == 0 {
        (None, Outcome::Undecided)
    } else {
        let percentage = agree_share as f64 / denominator as f64 * 100.0;
        let passed = agree_share * 100 >= resolution.minimum_pass_percentage as u32 * denominator;
        let outcome = if passed {
            Outcome::Passed
        } else {
            Outcome::Failed
        };
        (Some(percentage), outcome)
    };

    ResolutionTally {
        resolution_id: resolution.id.clone(),
        title: resolution.title.clone(),
        minimum_pass_percentage: resolution.minimum_pass_percentage,
        calculation_base: resolution.calculation_base,
        agree_share,
        disagree_share,
        abstain_share,
        present_share,
        total_share,
        denominator,
        agree_percentage,
        outcome,
        finality,
        voters,
        eligible_voters: participants.len(),
    }
}
