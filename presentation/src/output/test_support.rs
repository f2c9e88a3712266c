//! Shared fixtures for formatter tests

use ballot_domain::{
    CalculationBase, DraftDefaults, MeetingType, ParticipantDraft, RequestDraft, ResolutionDraft,
    VoteChoice, VotingRequest,
};
use chrono::{DateTime, Utc};

pub fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// A published request open from March 1st to March 8th 2026 with three
/// ballots cast on March 2nd
pub fn voted_request(discrete: bool) -> VotingRequest {
    let draft = RequestDraft {
        title: "Q1 board resolutions".to_string(),
        entity_name: "Acme Holdings".to_string(),
        meeting_number: "BM-2026-01".to_string(),
        meeting_type: MeetingType::BoardMeeting,
        start_date: at("2026-03-01T00:00:00Z"),
        end_date: at("2026-03-08T00:00:00Z"),
        discrete_voting: Some(discrete),
        allow_extensions: Some(true),
        equal_shares: false,
        participants: vec![
            ParticipantDraft {
                email: "ada@acme.test".to_string(),
                ..ParticipantDraft::new("Ada Lovelace", 40)
            },
            ParticipantDraft::new("Grace Hopper", 35),
            ParticipantDraft::new("Edsger Dijkstra", 25),
        ],
        resolutions: vec![
            ResolutionDraft::new("Approve annual budget")
                .with_threshold(51, CalculationBase::TotalVote),
            ResolutionDraft::new("Appoint auditor")
                .with_threshold(51, CalculationBase::VotesPresent),
        ],
        reminders: Default::default(),
    };

    let mut request = draft
        .build(
            "req-1".into(),
            &DraftDefaults::default(),
            at("2026-02-20T00:00:00Z"),
        )
        .unwrap();
    request.publish(at("2026-02-20T00:00:00Z")).unwrap();

    let voted_at = at("2026-03-02T00:00:00Z");
    request
        .record_vote(&"r1".into(), &"p1".into(), VoteChoice::Agree, voted_at)
        .unwrap();
    request
        .record_vote(&"r1".into(), &"p2".into(), VoteChoice::Disagree, voted_at)
        .unwrap();
    request
        .record_vote(&"r2".into(), &"p1".into(), VoteChoice::Agree, voted_at)
        .unwrap();
    request
}
