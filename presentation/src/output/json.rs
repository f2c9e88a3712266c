//! JSON output formatter
//!
//! Every result is rendered as one pretty-printed JSON document using the
//! same camelCase field names as the stored requests.

use crate::output::formatter::{ConfigReport, OutputFormatter, VoteReceipt};
use ballot_application::{BallotError, OwnBallot, RequestSummary, VotingStats};
use ballot_domain::{ExtensionRequest, ParticipantId, RequestId, RequestTally, RequestView};
use serde::Serialize;
use serde_json::json;

/// Formats ballot results as JSON
pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn request(&self, view: &RequestView) -> String {
        Self::render(view)
    }

    fn summaries(&self, summaries: &[RequestSummary]) -> String {
        Self::render(summaries)
    }

    fn tally(&self, tally: &RequestTally) -> String {
        Self::render(tally)
    }

    fn stats(&self, stats: &VotingStats) -> String {
        Self::render(stats)
    }

    fn vote(&self, receipt: &VoteReceipt) -> String {
        Self::render(receipt)
    }

    fn own_ballots(
        &self,
        request_id: &RequestId,
        participant: &ParticipantId,
        ballots: &[OwnBallot],
    ) -> String {
        Self::render(&json!({
            "requestId": request_id,
            "participantId": participant,
            "ballots": ballots,
        }))
    }

    fn extension(&self, request_id: &RequestId, extension: &ExtensionRequest) -> String {
        Self::render(&json!({
            "requestId": request_id,
            "extension": extension,
        }))
    }

    fn shares(&self, shares: &[u8]) -> String {
        Self::render(shares)
    }

    fn config(&self, report: &ConfigReport) -> String {
        Self::render(report)
    }

    fn error(&self, error: &BallotError) -> String {
        Self::render(&json!({
            "error": {
                "code": error.code(),
                "message": error.to_string(),
            }
        }))
    }
}
