//! Output formatter trait

use ballot_application::{BallotError, OwnBallot, RequestSummary, VotingStats};
use ballot_domain::{
    ExtensionRequest, ParticipantId, RequestId, RequestTally, RequestView, ResolutionId, Vote,
};
use serde::Serialize;
use std::path::PathBuf;

/// A vote as acknowledged back to the voter
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub request_id: RequestId,
    pub resolution_id: ResolutionId,
    #[serde(flatten)]
    pub vote: Vote,
}

/// One configuration file location
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSource {
    pub label: String,
    pub path: PathBuf,
    pub exists: bool,
}

/// What `ballot config` reports
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub sources: Vec<ConfigSource>,
    pub effective: serde_json::Value,
    /// Rendered validation issues, `error:` / `warning:` prefixed
    pub issues: Vec<String>,
}

/// Trait for rendering command results
pub trait OutputFormatter {
    /// A single request as seen by some audience
    fn request(&self, view: &RequestView) -> String;

    /// A request listing
    fn summaries(&self, summaries: &[RequestSummary]) -> String;

    fn tally(&self, tally: &RequestTally) -> String;

    fn stats(&self, stats: &VotingStats) -> String;

    fn vote(&self, receipt: &VoteReceipt) -> String;

    /// A participant's own recorded choices
    fn own_ballots(
        &self,
        request_id: &RequestId,
        participant: &ParticipantId,
        ballots: &[OwnBallot],
    ) -> String;

    fn extension(&self, request_id: &RequestId, extension: &ExtensionRequest) -> String;

    /// Equal-share allocation preview
    fn shares(&self, shares: &[u8]) -> String;

    fn config(&self, report: &ConfigReport) -> String;

    /// A failed command, keyed by its stable error code
    fn error(&self, error: &BallotError) -> String;
}
