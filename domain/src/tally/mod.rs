//! Tally calculator
//!
//! Computes pass/fail per resolution from a snapshot of recorded votes, plus
//! aggregate progress. Outcomes are provisional until the request reaches
//! `completed`; only the final tally is binding.

pub mod calculator;
pub mod progress;
pub mod shares;

pub use calculator::{ResolutionTally, tally_resolution};
pub use progress::{RequestProgress, RequestTally, tally_request};
pub use shares::allocate_equal_shares;

use serde::{Deserialize, Serialize};

/// Outcome of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Agree percentage reached the threshold
    Passed,
    /// Agree percentage is below the threshold
    Failed,
    /// Nothing to measure against (no votes under `votes_present`)
    Undecided,
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Passed => write!(f, "PASSED"),
            Outcome::Failed => write!(f, "FAILED"),
            Outcome::Undecided => write!(f, "UNDECIDED"),
        }
    }
}

/// Whether an outcome can still change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finality {
    /// More votes, an extension or a review may still change it
    Provisional,
    /// The request is completed; the outcome is binding
    Final,
}

impl std::fmt::Display for Finality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Finality::Provisional => write!(f, "provisional"),
            Finality::Final => write!(f, "final"),
        }
    }
}
