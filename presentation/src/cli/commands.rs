//! CLI command definitions

use ballot_domain::{
    Audience, ExtensionId, ParticipantId, RequestId, RequestStatus, ResolutionId, VoteChoice,
};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console output
    Text,
    /// JSON output
    Json,
}

impl From<OutputFormat> for ballot_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ballot_domain::OutputFormat::Text,
            OutputFormat::Json => ballot_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for resolution-ballot
#[derive(Parser, Debug)]
#[command(name = "ballot")]
#[command(author, version, about = "Corporate resolution voting with weighted shares")]
#[command(long_about = r#"
Ballot runs corporate voting requests: a set of resolutions put to weighted
participants inside a fixed voting window.

A request moves draft -> scheduled -> in_progress -> completed. The phase is
derived from the clock on every command, so nothing runs in the background.
Each participant casts one immutable vote per resolution while the window is
open. A resolution passes when the agreeing share reaches its minimum pass
percentage of all shares (total_vote) or of the shares present.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./ballot.toml       Project-level config
3. ~/.config/resolution-ballot/config.toml   Global config

Example:
  ballot --store votes.json create --file agm.json
  ballot --store votes.json publish <id>
  ballot --store votes.json vote <id> r1 p1 agree
  ballot --store votes.json tally <id>
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// JSON snapshot file holding all requests (in-memory when unset)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Output format (overrides [output] format)
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Evaluate time-dependent commands at this instant (RFC 3339)
    #[arg(long, global = true, value_name = "RFC3339", value_parser = parse_instant)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a draft request from a JSON file
    Create {
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },
    /// Apply a JSON patch to a request
    Update {
        id: RequestId,
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },
    /// Publish a draft
    Publish { id: RequestId },
    /// Delete a draft
    Discard { id: RequestId },
    /// Show a request as a given audience
    Show {
        id: RequestId,
        #[command(flatten)]
        audience: AudienceArgs,
    },
    /// List requests
    List {
        /// Filter by derived phase
        #[arg(long, value_parser = parse_status)]
        status: Option<RequestStatus>,
        /// Case-insensitive match on title, entity name and meeting number
        #[arg(long)]
        search: Option<String>,
    },
    /// Cast a vote
    Vote {
        id: RequestId,
        resolution: ResolutionId,
        participant: ParticipantId,
        #[arg(value_parser = parse_choice)]
        choice: VoteChoice,
    },
    /// Show a participant's own recorded choices
    MyVotes {
        id: RequestId,
        participant: ParticipantId,
    },
    /// Tally every resolution of a request
    Tally {
        id: RequestId,
        #[command(flatten)]
        audience: AudienceArgs,
    },
    /// Count requests by phase
    Stats,
    /// Manual review of an active or completed request
    #[command(subcommand)]
    Review(ReviewCommand),
    /// Deadline extensions
    #[command(subcommand)]
    Extension(ExtensionCommand),
    /// Split 100 shares equally between N participants
    Shares { count: usize },
    /// Show configuration sources and effective values
    Config,
}

#[derive(Subcommand, Debug)]
pub enum ReviewCommand {
    /// Put a request into review
    Enter {
        id: RequestId,
        #[arg(long)]
        reason: String,
    },
    /// Leave review and resume the date-derived phase
    Exit { id: RequestId },
}

#[derive(Subcommand, Debug)]
pub enum ExtensionCommand {
    /// Ask for a later deadline
    Request {
        id: RequestId,
        participant: ParticipantId,
        #[arg(long)]
        reason: String,
    },
    /// Grant a pending extension
    Grant {
        id: RequestId,
        extension: ExtensionId,
        #[arg(long, value_name = "RFC3339", value_parser = parse_instant)]
        until: DateTime<Utc>,
    },
    /// Reject a pending extension
    Reject {
        id: RequestId,
        extension: ExtensionId,
    },
}

/// Who is reading: an administrator unless `--as` or `--public` is given
#[derive(Args, Debug, Clone, Default)]
pub struct AudienceArgs {
    /// Read as this participant
    #[arg(long = "as", value_name = "PARTICIPANT", conflicts_with = "public")]
    pub participant: Option<ParticipantId>,

    /// Read as an outside observer
    #[arg(long)]
    pub public: bool,
}

impl AudienceArgs {
    pub fn audience(&self) -> Audience {
        match (&self.participant, self.public) {
            (Some(id), _) => Audience::Participant(id.clone()),
            (None, true) => Audience::Public,
            (None, false) => Audience::Administrator,
        }
    }
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{}': {}", s, e))
}

fn parse_status(s: &str) -> Result<RequestStatus, String> {
    s.parse()
}

fn parse_choice(s: &str) -> Result<VoteChoice, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ballot").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_vote_arguments() {
        let cli = parse(&["vote", "req-1", "r2", "p3", "yes"]);
        match cli.command {
            Command::Vote {
                id,
                resolution,
                participant,
                choice,
            } => {
                assert_eq!(id.as_str(), "req-1");
                assert_eq!(resolution.as_str(), "r2");
                assert_eq!(participant.as_str(), "p3");
                assert_eq!(choice, VoteChoice::Agree);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_choice_is_rejected() {
        let result = Cli::try_parse_from(["ballot", "vote", "req-1", "r1", "p1", "maybe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&[
            "stats",
            "-vv",
            "--store",
            "votes.json",
            "-o",
            "json",
            "--now",
            "2025-03-01T12:00:00+02:00",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.store, Some(PathBuf::from("votes.json")));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(
            cli.now,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_invalid_now_is_rejected() {
        let result = Cli::try_parse_from(["ballot", "stats", "--now", "tomorrow"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_audience_defaults_to_administrator() {
        let cli = parse(&["show", "req-1"]);
        let Command::Show { audience, .. } = cli.command else {
            panic!("expected show");
        };
        assert_eq!(audience.audience(), Audience::Administrator);
    }

    #[test]
    fn test_audience_participant_and_public() {
        let cli = parse(&["tally", "req-1", "--as", "p2"]);
        let Command::Tally { audience, .. } = cli.command else {
            panic!("expected tally");
        };
        assert_eq!(audience.audience(), Audience::Participant("p2".into()));

        let cli = parse(&["tally", "req-1", "--public"]);
        let Command::Tally { audience, .. } = cli.command else {
            panic!("expected tally");
        };
        assert_eq!(audience.audience(), Audience::Public);
    }

    #[test]
    fn test_as_conflicts_with_public() {
        let result = Cli::try_parse_from(["ballot", "show", "req-1", "--as", "p1", "--public"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_status_accepts_aliases() {
        let cli = parse(&["list", "--status", "active", "--search", "agm"]);
        let Command::List { status, search } = cli.command else {
            panic!("expected list");
        };
        assert_eq!(status, Some(RequestStatus::InProgress));
        assert_eq!(search.as_deref(), Some("agm"));
    }

    #[test]
    fn test_extension_grant_requires_until() {
        assert!(Cli::try_parse_from(["ballot", "extension", "grant", "req-1", "ext-1"]).is_err());

        let cli = parse(&[
            "extension",
            "grant",
            "req-1",
            "ext-1",
            "--until",
            "2025-03-10T00:00:00Z",
        ]);
        let Command::Extension(ExtensionCommand::Grant { extension, until, .. }) = cli.command
        else {
            panic!("expected extension grant");
        };
        assert_eq!(extension.as_str(), "ext-1");
        assert_eq!(until, Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_review_enter_requires_reason() {
        assert!(Cli::try_parse_from(["ballot", "review", "enter", "req-1"]).is_err());
        let cli = parse(&["review", "enter", "req-1", "--reason", "recount"]);
        assert!(matches!(
            cli.command,
            Command::Review(ReviewCommand::Enter { ref reason, .. }) if reason == "recount"
        ));
    }

    #[test]
    fn test_output_format_maps_to_domain() {
        assert_eq!(
            ballot_domain::OutputFormat::from(OutputFormat::Json),
            ballot_domain::OutputFormat::Json
        );
    }
}
