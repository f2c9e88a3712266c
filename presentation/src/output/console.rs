//! Console output formatter for ballot results

use crate::output::formatter::{ConfigReport, OutputFormatter, VoteReceipt};
use ballot_application::{BallotError, OwnBallot, RequestSummary, VotingStats};
use ballot_domain::{
    ExtensionRequest, Finality, Outcome, ParticipantId, RequestId, RequestStatus, RequestTally,
    RequestView, ResolutionTally,
};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};

/// Formats ballot results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    fn field(label: &str, value: impl std::fmt::Display) -> String {
        format!("{} {}\n", format!("{:<10}", label).cyan().bold(), value)
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn instant(at: DateTime<Utc>) -> String {
        at.format("%Y-%m-%d %H:%M UTC").to_string()
    }

    fn phase(status: RequestStatus) -> ColoredString {
        let label = status.display_name();
        match status {
            RequestStatus::Draft => label.dimmed(),
            RequestStatus::Scheduled => label.blue(),
            RequestStatus::InProgress => label.green().bold(),
            RequestStatus::Completed => label.bold(),
            RequestStatus::Review => label.yellow().bold(),
        }
    }

    fn outcome(outcome: Outcome, finality: Finality) -> String {
        let label = match outcome {
            Outcome::Passed => outcome.to_string().green().bold(),
            Outcome::Failed => outcome.to_string().red().bold(),
            Outcome::Undecided => outcome.to_string().yellow(),
        };
        match finality {
            Finality::Final => format!("{} ({})", label, finality),
            Finality::Provisional => format!("{} {}", label, format!("({})", finality).dimmed()),
        }
    }

    fn percentage(value: Option<f64>) -> String {
        value.map_or_else(|| "n/a".to_string(), |p| format!("{:.1}%", p))
    }

    /// One-line share breakdown for a resolution
    fn breakdown(tally: &ResolutionTally) -> String {
        format!(
            "agree {} / disagree {} / abstain {} of {} -> {} (needs {}% of {})",
            tally.agree_share,
            tally.disagree_share,
            tally.abstain_share,
            tally.denominator,
            Self::percentage(tally.agree_percentage),
            tally.minimum_pass_percentage,
            tally.calculation_base,
        )
    }

    fn extension_state(extension: &ExtensionRequest) -> ColoredString {
        match extension.new_end_date {
            Some(until) if extension.resolved => {
                format!("granted until {}", Self::instant(until)).green()
            }
            _ if extension.resolved => "rejected".red(),
            _ => "pending".yellow(),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn request(&self, view: &RequestView) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&view.title));
        output.push('\n');

        output.push_str(&Self::field("Request:", &view.id));
        output.push_str(&Self::field("Entity:", &view.entity_name));
        output.push_str(&Self::field(
            "Meeting:",
            format!(
                "{} ({})",
                view.meeting_number,
                view.meeting_type.display_name()
            ),
        ));

        let voting = if view.voting_open {
            "voting open".green()
        } else {
            "voting closed".dimmed()
        };
        output.push_str(&Self::field(
            "Phase:",
            format!("{} ({})", Self::phase(view.phase), voting),
        ));

        let mut window = format!(
            "{} -> {}",
            Self::instant(view.start_date),
            Self::instant(view.effective_end_date)
        );
        if view.effective_end_date != view.end_date {
            window.push_str(&format!(
                " {}",
                format!("(extended from {})", Self::instant(view.end_date)).yellow()
            ));
        }
        output.push_str(&Self::field("Window:", window));

        let mut flags = Vec::new();
        if view.discrete_voting {
            flags.push("discrete voting");
        }
        if view.allow_extensions {
            flags.push("extensions allowed");
        }
        if !flags.is_empty() {
            output.push_str(&Self::field("Flags:", flags.join(", ")));
        }

        output.push_str(&Self::section_header("Participants"));
        for participant in &view.participants {
            output.push_str(&format!(
                "  {:<6} {:<28} {:>3}%",
                participant.id.as_str(),
                participant.name,
                participant.voting_share
            ));
            if let Some(email) = participant.email.as_deref().filter(|e| !e.is_empty()) {
                output.push_str(&format!("  {}", email.dimmed()));
            }
            output.push('\n');
        }

        output.push_str(&Self::section_header("Resolutions"));
        for resolution in &view.resolutions {
            output.push_str(&format!(
                "\n{}\n",
                format!("── {} {} ──", resolution.id, resolution.title)
                    .yellow()
                    .bold()
            ));
            if !resolution.description.is_empty() {
                output.push_str(&Self::indent(&resolution.description, "   "));
                output.push('\n');
            }
            output.push_str(&format!("   {}\n", Self::breakdown(&resolution.tally)));
            output.push_str(&format!(
                "   {}\n",
                Self::outcome(resolution.tally.outcome, resolution.tally.finality)
            ));

            if !resolution.votes.is_empty() {
                let ballots = resolution
                    .votes
                    .iter()
                    .map(|vote| format!("{} {}", vote.participant_id, vote.choice))
                    .collect::<Vec<_>>()
                    .join(", ");
                output.push_str(&format!("   {} {}\n", "Votes:".bold(), ballots));
            }
            if resolution.concealed {
                output.push_str(&format!(
                    "   {}\n",
                    "Individual ballots are concealed".dimmed()
                ));
            }
            if let Some(choice) = resolution.own_choice {
                output.push_str(&format!("   {} {}\n", "Your vote:".bold(), choice));
            }
        }

        if !view.extensions.is_empty() {
            output.push_str(&Self::section_header("Extensions"));
            for extension in &view.extensions {
                output.push_str(&format!(
                    "  {:<8} {} {}  {}\n",
                    extension.id.as_str(),
                    extension.participant_id,
                    Self::extension_state(extension),
                    extension.reason.dimmed()
                ));
            }
        }

        output.push_str(&format!(
            "\n{} {}/{} participants voted ({:.1}%)\n",
            "Progress:".cyan().bold(),
            view.progress.voted_participants,
            view.progress.total_participants,
            view.progress.turnout_percentage()
        ));

        output.push_str(&Self::footer());
        output
    }

    fn summaries(&self, summaries: &[RequestSummary]) -> String {
        if summaries.is_empty() {
            return format!("{}\n", "No voting requests".dimmed());
        }

        let mut output = String::new();
        for summary in summaries {
            output.push_str(&format!(
                "{}  {}  {}\n",
                summary.id.as_str().bold(),
                Self::phase(summary.phase),
                summary.title
            ));
            let mut detail = format!(
                "    {} · {} · {} -> {} · {}/{} voted · {} resolution(s)",
                summary.entity_name,
                summary.meeting_number,
                Self::instant(summary.start_date),
                Self::instant(summary.effective_end_date),
                summary.voted_participants,
                summary.participants,
                summary.resolutions
            );
            if summary.pending_extension {
                detail.push_str(" · extension pending");
            }
            output.push_str(&format!("{}\n", detail.dimmed()));
        }
        output
    }

    fn tally(&self, tally: &RequestTally) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Tally of {}", tally.request_id)));
        output.push('\n');
        output.push_str(&Self::field("Phase:", Self::phase(tally.phase)));
        output.push_str(&Self::field("Computed:", Self::instant(tally.computed_at)));

        for resolution in &tally.resolutions {
            output.push_str(&format!(
                "\n{}\n",
                format!("── {} {} ──", resolution.resolution_id, resolution.title)
                    .yellow()
                    .bold()
            ));
            output.push_str(&format!("   {}\n", Self::breakdown(resolution)));
            output.push_str(&format!(
                "   present {} of {} · {}/{} voted\n",
                resolution.present_share,
                resolution.total_share,
                resolution.voters,
                resolution.eligible_voters
            ));
            output.push_str(&format!(
                "   {}\n",
                Self::outcome(resolution.outcome, resolution.finality)
            ));
        }

        output.push_str(&format!(
            "\n{} {}/{} participants voted ({:.1}%)\n",
            "Progress:".cyan().bold(),
            tally.progress.voted_participants,
            tally.progress.total_participants,
            tally.progress.turnout_percentage()
        ));
        if let Some(passed) = tally.progress.passed_resolutions {
            output.push_str(&format!(
                "{} {}/{} resolutions passed\n",
                "Result:".cyan().bold(),
                passed,
                tally.progress.total_resolutions
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    fn stats(&self, stats: &VotingStats) -> String {
        let mut output = String::new();
        output.push_str(&Self::section_header("Voting requests"));
        output.push_str(&Self::field("Draft:", stats.draft));
        output.push_str(&Self::field("Scheduled:", stats.scheduled));
        output.push_str(&Self::field("Active:", stats.in_progress));
        output.push_str(&Self::field("Completed:", stats.completed));
        output.push_str(&Self::field("Review:", stats.review));
        output.push_str(&Self::field("Total:", stats.total));
        output.push_str(&Self::field("Votes:", stats.votes));
        output
    }

    fn vote(&self, receipt: &VoteReceipt) -> String {
        format!(
            "{} {} voted {} on {} of {} at {}\n",
            "✓".green().bold(),
            receipt.vote.participant_id,
            receipt.vote.choice.as_str().bold(),
            receipt.resolution_id,
            receipt.request_id,
            Self::instant(receipt.vote.voted_at)
        )
    }

    fn own_ballots(
        &self,
        request_id: &RequestId,
        participant: &ParticipantId,
        ballots: &[OwnBallot],
    ) -> String {
        if ballots.is_empty() {
            return format!(
                "{}\n",
                format!("{} has not voted on {}", participant, request_id).dimmed()
            );
        }

        let mut output = Self::section_header(&format!("Votes of {} on {}", participant, request_id));
        for ballot in ballots {
            output.push_str(&format!(
                "  {:<6} {:<9} {}  {}\n",
                ballot.resolution_id.as_str(),
                ballot.choice.as_str(),
                ballot.resolution_title,
                Self::instant(ballot.voted_at).dimmed()
            ));
        }
        output
    }

    fn extension(&self, request_id: &RequestId, extension: &ExtensionRequest) -> String {
        format!(
            "{} {} on {} by {}: {}\n",
            "Extension".cyan().bold(),
            extension.id,
            request_id,
            extension.participant_id,
            Self::extension_state(extension)
        )
    }

    fn shares(&self, shares: &[u8]) -> String {
        let mut output = String::new();
        for (index, share) in shares.iter().enumerate() {
            output.push_str(&format!("  p{:<5} {:>3}%\n", index + 1, share));
        }
        output.push_str(&format!(
            "{} {}%\n",
            "Total:".bold(),
            shares.iter().map(|share| u32::from(*share)).sum::<u32>()
        ));
        output
    }

    fn config(&self, report: &ConfigReport) -> String {
        let mut output = Self::section_header("Configuration files");
        for source in &report.sources {
            let marker = if source.exists {
                "found".green()
            } else {
                "missing".dimmed()
            };
            output.push_str(&format!(
                "  {:<10} {} ({})\n",
                source.label,
                source.path.display(),
                marker
            ));
        }

        output.push_str(&Self::section_header("Effective settings"));
        let effective =
            serde_json::to_string_pretty(&report.effective).unwrap_or_else(|_| "{}".to_string());
        output.push_str(&Self::indent(&effective, "  "));
        output.push('\n');

        if !report.issues.is_empty() {
            output.push_str(&Self::section_header("Issues"));
            for issue in &report.issues {
                output.push_str(&format!("  {}\n", issue.yellow()));
            }
        }
        output
    }

    fn error(&self, error: &BallotError) -> String {
        format!("{} [{}] {}", "Error:".red().bold(), error.code(), error)
    }
}
