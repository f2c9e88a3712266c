//! Voting request aggregate, draft inputs and read views

pub mod ballot;
pub mod draft;
pub mod entities;
pub mod reminders;
pub mod view;

pub use draft::{DraftDefaults, ParticipantDraft, RequestDraft, RequestPatch, ResolutionDraft};
pub use entities::{
    CalculationBase, MeetingType, Participant, Resolution, Vote, VoteChoice, VotingRequest,
};
pub use reminders::{ReminderAudience, ReminderConfig, ReminderFrequency};
pub use view::{Audience, ParticipantView, RequestView, ResolutionView};
