//! Fixtures for adapter tests

use ballot_domain::{
    CalculationBase, DraftDefaults, MeetingType, ParticipantDraft, RequestDraft, RequestId,
    ResolutionDraft, VotingRequest,
};
use chrono::{DateTime, Utc};

pub fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().expect("valid RFC 3339 timestamp")
}

/// Published board meeting running 2026-03-01 to 2026-03-08 with
/// p1..p5 (shares [25, 30, 20, 15, 10]) and resolutions r1, r2
pub fn published_request(id: RequestId) -> VotingRequest {
    let draft = RequestDraft {
        title: "Q1 board resolutions".to_string(),
        entity_name: "Acme Holdings".to_string(),
        meeting_number: "BM-2026-01".to_string(),
        meeting_type: MeetingType::BoardMeeting,
        start_date: at("2026-03-01T00:00:00Z"),
        end_date: at("2026-03-08T00:00:00Z"),
        discrete_voting: None,
        allow_extensions: Some(true),
        equal_shares: false,
        participants: [
            ("Ada Lovelace", 25),
            ("Grace Hopper", 30),
            ("Edsger Dijkstra", 20),
            ("Barbara Liskov", 15),
            ("Donald Knuth", 10),
        ]
        .into_iter()
        .map(|(name, share)| ParticipantDraft::new(name, share))
        .collect(),
        resolutions: vec![
            ResolutionDraft::new("Approve annual budget")
                .with_threshold(51, CalculationBase::TotalVote),
            ResolutionDraft::new("Appoint auditor")
                .with_threshold(51, CalculationBase::VotesPresent),
        ],
        reminders: Default::default(),
    };

    let created = at("2026-02-01T00:00:00Z");
    let mut request = draft
        .build(id, &DraftDefaults::default(), created)
        .expect("fixture draft is valid");
    request.publish(created).expect("fixture draft publishes");
    request
}
