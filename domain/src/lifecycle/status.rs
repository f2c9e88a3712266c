//! Request status and transition table
//!
//! Two types cooperate here:
//!
//! - [`LifecycleState`] is what gets stored: draft, published, or held in
//!   review. It only changes through explicit operations.
//! - [`RequestStatus`] is what callers observe. For a published request it is
//!   derived from the clock and the stored dates on every read.
//!
//! ```text
//! draft ──publish──▶ scheduled ──start──▶ in_progress ──deadline──▶ completed
//!                                             │    ▲                 │    ▲
//!                                             ▼    │                 ▼    │
//!                                             review ─────────────▶ review
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Observable status of a voting request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Draft,
    Scheduled,
    InProgress,
    Completed,
    Review,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Draft,
        RequestStatus::Scheduled,
        RequestStatus::InProgress,
        RequestStatus::Completed,
        RequestStatus::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Draft => "draft",
            RequestStatus::Scheduled => "scheduled",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Completed => "completed",
            RequestStatus::Review => "review",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RequestStatus::Draft => "Draft",
            RequestStatus::Scheduled => "Scheduled",
            RequestStatus::InProgress => "In Progress",
            RequestStatus::Completed => "Completed",
            RequestStatus::Review => "Under Review",
        }
    }

    /// Position on the linear track; `None` for the orthogonal review state.
    fn rank(&self) -> Option<u8> {
        match self {
            RequestStatus::Draft => Some(0),
            RequestStatus::Scheduled => Some(1),
            RequestStatus::InProgress => Some(2),
            RequestStatus::Completed => Some(3),
            RequestStatus::Review => None,
        }
    }

    /// Transition table.
    ///
    /// The linear track only moves forward (observers may skip states, e.g. a
    /// request published after its start date goes straight to
    /// `in_progress`). Review is entered from `in_progress` or `completed`
    /// and leaves to one of those two.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        use RequestStatus::*;
        match (self, next) {
            (InProgress | Completed, Review) => true,
            (Review, InProgress | Completed) => true,
            (Review, _) | (_, Review) => false,
            (from, to) => match (from.rank(), to.rank()) {
                (Some(a), Some(b)) => b > a,
                _ => false,
            },
        }
    }

    /// Whether votes may still change a resolution's outcome in this status
    pub fn is_open_ended(&self) -> bool {
        !matches!(self, RequestStatus::Completed)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace(['-', ' '], "_");
        RequestStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .or(match normalized.as_str() {
                "active" => Some(RequestStatus::InProgress),
                _ => None,
            })
            .ok_or_else(|| {
                format!(
                    "Unknown status: {}. Valid: draft, scheduled, in_progress, completed, review",
                    s
                )
            })
    }
}

/// Stored lifecycle flag of a voting request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LifecycleState {
    /// Editable, invisible to participants
    #[default]
    Draft,
    /// Published; the observable status follows the dates
    Published,
    /// Manually escalated
    #[serde(rename_all = "camelCase")]
    Review {
        /// Observed status at the moment review was entered
        entered_from: RequestStatus,
        reason: String,
        entered_at: DateTime<Utc>,
    },
}

impl LifecycleState {
    pub fn is_draft(&self) -> bool {
        matches!(self, LifecycleState::Draft)
    }

    pub fn is_review(&self) -> bool {
        matches!(self, LifecycleState::Review { .. })
    }
}
