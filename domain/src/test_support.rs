//! Shared fixtures for unit tests

use crate::lifecycle::status::LifecycleState;
use crate::request::{
    CalculationBase, DraftDefaults, MeetingType, Participant, ParticipantDraft, RequestDraft,
    ResolutionDraft, VotingRequest,
};
use chrono::{DateTime, Utc};

pub fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().expect("valid RFC 3339 timestamp")
}

const PEOPLE: [(&str, u8); 5] = [
    ("Ada Lovelace", 25),
    ("Grace Hopper", 30),
    ("Edsger Dijkstra", 20),
    ("Barbara Liskov", 15),
    ("Donald Knuth", 10),
];

/// p1..p5 with shares [25, 30, 20, 15, 10]
pub fn sample_participants() -> Vec<Participant> {
    PEOPLE
        .iter()
        .enumerate()
        .map(|(index, (name, share))| Participant {
            id: crate::core::ids::ParticipantId::positional(index),
            name: name.to_string(),
            email: format!("p{}@acme.test", index + 1),
            mobile: format!("+1555000{}", index + 1),
            voting_share: *share,
        })
        .collect()
}

/// Board meeting running 2026-03-01 to 2026-03-08 with two resolutions:
/// r1 (51%, total_vote) and r2 (51%, votes_present)
pub fn sample_draft() -> RequestDraft {
    RequestDraft {
        title: "Q1 board resolutions".to_string(),
        entity_name: "Acme Holdings".to_string(),
        meeting_number: "BM-2026-01".to_string(),
        meeting_type: MeetingType::BoardMeeting,
        start_date: at("2026-03-01T00:00:00Z"),
        end_date: at("2026-03-08T00:00:00Z"),
        discrete_voting: Some(false),
        allow_extensions: Some(true),
        equal_shares: false,
        participants: PEOPLE
            .iter()
            .enumerate()
            .map(|(index, (name, share))| ParticipantDraft {
                email: format!("p{}@acme.test", index + 1),
                ..ParticipantDraft::new(*name, *share)
            })
            .collect(),
        resolutions: vec![
            ResolutionDraft::new("Approve annual budget")
                .with_threshold(51, CalculationBase::TotalVote),
            ResolutionDraft::new("Appoint auditor")
                .with_threshold(51, CalculationBase::VotesPresent),
        ],
        reminders: Default::default(),
    }
}

pub fn draft_request() -> VotingRequest {
    sample_draft()
        .build(
            "req-1".into(),
            &DraftDefaults::default(),
            at("2026-02-01T00:00:00Z"),
        )
        .expect("sample draft is valid")
}

pub fn published_request() -> VotingRequest {
    let mut request = draft_request();
    request.lifecycle = LifecycleState::Published;
    request.published_at = Some(at("2026-02-01T00:00:00Z"));
    request
}
