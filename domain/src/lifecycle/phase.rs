//! Lazy phase derivation
//!
//! Nothing ticks in the background. The observable status and the voting
//! window are computed from the stored lifecycle flag, the dates and `now`
//! every time they are needed.

use crate::core::error::WindowReason;
use crate::extension::ExtensionRequest;
use crate::lifecycle::status::{LifecycleState, RequestStatus};
use crate::request::VotingRequest;
use crate::tally::Finality;
use chrono::{DateTime, Utc};

impl VotingRequest {
    /// `end_date`, or the latest granted extension's new end date.
    pub fn effective_end_date(&self) -> DateTime<Utc> {
        self.extensions
            .iter()
            .filter_map(|ext| ext.new_end_date)
            .fold(self.end_date, |latest, granted| latest.max(granted))
    }

    /// The unresolved extension request, if one exists
    pub fn pending_extension(&self) -> Option<&ExtensionRequest> {
        self.extensions.iter().find(|ext| !ext.resolved)
    }

    /// Observable status at `now`. Pure; never mutates.
    ///
    /// A pending extension request defers closure: the request stays
    /// `in_progress` past its deadline until the extension is granted or
    /// rejected, although the ballot itself is closed at the deadline.
    pub fn current_phase(&self, now: DateTime<Utc>) -> RequestStatus {
        match &self.lifecycle {
            LifecycleState::Draft => RequestStatus::Draft,
            LifecycleState::Review { .. } => RequestStatus::Review,
            LifecycleState::Published => self.date_phase(now),
        }
    }

    /// Status a published request has at `now`, ignoring the stored flag
    pub(crate) fn date_phase(&self, now: DateTime<Utc>) -> RequestStatus {
        if now < self.start_date {
            RequestStatus::Scheduled
        } else if now < self.effective_end_date() || self.pending_extension().is_some() {
            RequestStatus::InProgress
        } else {
            RequestStatus::Completed
        }
    }

    /// Check whether a ballot cast at `now` may be accepted
    pub fn voting_window(&self, now: DateTime<Utc>) -> Result<(), WindowReason> {
        match &self.lifecycle {
            LifecycleState::Draft => Err(WindowReason::NotYetOpen),
            LifecycleState::Review { .. } => Err(WindowReason::UnderReview),
            LifecycleState::Published => {
                if now < self.start_date {
                    Err(WindowReason::NotYetOpen)
                } else if now >= self.effective_end_date() {
                    Err(WindowReason::AlreadyClosed)
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn is_voting_open(&self, now: DateTime<Utc>) -> bool {
        self.voting_window(now).is_ok()
    }

    /// Whether tallies computed at `now` are binding
    pub fn finality(&self, now: DateTime<Utc>) -> Finality {
        match self.current_phase(now) {
            RequestStatus::Completed => Finality::Final,
            _ => Finality::Provisional,
        }
    }
}
