//! CLI entrypoint for resolution-ballot
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use ballot_application::{
    BallotError, BallotEventLogger, CastVoteInput, CastVoteUseCase, Clock, CreateRequestUseCase,
    FixedClock, ManageExtensionsUseCase, ManageRequestUseCase, NoBallotEventLogger,
    QueryRequestsUseCase, RequestFilter, SystemClock, TallyRequestUseCase,
    VotingRequestRepository,
};
use ballot_domain::{
    Audience, ConfigIssue, DraftDefaults, RequestDraft, RequestPatch, RequestView, Severity,
    VotingRequest, allocate_equal_shares,
};
use ballot_infrastructure::{
    ConfigLoader, FileConfig, FileLoggingConfig, InMemoryVotingRequestRepository, JsonFileRepository,
    JsonlBallotEventLogger,
};
use ballot_presentation::{
    Cli, Command, ConfigReport, ConfigSource, ExtensionCommand, OutputConfig, OutputFormatter,
    ReviewCommand, VoteReceipt,
};
use clap::Parser;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        if let Some(path) = &cli.config
            && !path.exists()
        {
            bail!("Config file not found: {}", path.display());
        }
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, &config.logging)?;

    info!("Starting resolution-ballot");

    let issues = config.validate();
    for issue in issues.iter().filter(|issue| !issue.is_error()) {
        warn!("{}", issue.message);
    }

    let output = OutputConfig::resolve(cli.output, config.output.format, config.output.color);
    if !output.color {
        colored::control::set_override(false);
    }
    let formatter = output.formatter();

    // Commands that never touch the store
    match &cli.command {
        Command::Config => {
            let report = config_report(&cli, &config, &issues)?;
            println!("{}", formatter.config(&report));
            return Ok(ExitCode::SUCCESS);
        }
        Command::Shares { count } => {
            if !(1..=100).contains(count) {
                bail!("Participant count must be between 1 and 100, got {}", count);
            }
            println!("{}", formatter.shares(&allocate_equal_shares(*count)));
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    if let Some(issue) = issues.iter().find(|issue| issue.is_error()) {
        bail!("Invalid configuration: {}", issue.message);
    }

    // === Dependency Injection ===
    let clock: Arc<dyn Clock> = match cli.now {
        Some(instant) => {
            debug!("Pinning clock to {}", instant);
            Arc::new(FixedClock::new(instant))
        }
        None => Arc::new(SystemClock),
    };

    let events: Arc<dyn BallotEventLogger> = match &config.events.log_file {
        Some(path) => match JsonlBallotEventLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => {
                warn!("Ballot events will not be recorded");
                Arc::new(NoBallotEventLogger)
            }
        },
        None => Arc::new(NoBallotEventLogger),
    };

    let (defaults, _) = config.defaults.to_draft_defaults();

    let store = cli.store.clone().or_else(|| config.storage.path.clone());
    let result = match store {
        Some(path) => {
            info!("Using request store {}", path.display());
            let repository = JsonFileRepository::open(&path)
                .await
                .map_err(|e| anyhow!("Failed to open store {}: {}", path.display(), e))?;
            let app = App::new(Arc::new(repository), clock, events, defaults);
            app.run(&cli.command, formatter.as_ref()).await
        }
        None => {
            warn!("No --store given; requests live only for this invocation");
            let repository = InMemoryVotingRequestRepository::new();
            let app = App::new(Arc::new(repository), clock, events, defaults);
            app.run(&cli.command, formatter.as_ref()).await
        }
    };

    match result {
        Ok(rendered) => {
            println!("{}", rendered);
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => match error.downcast_ref::<BallotError>() {
            Some(ballot_error) => {
                debug!("Command failed: {:?}", ballot_error);
                eprintln!("{}", formatter.error(ballot_error));
                Ok(ExitCode::FAILURE)
            }
            None => Err(error),
        },
    }
}

/// Initialize logging based on verbosity level.
///
/// `RUST_LOG` overrides `-v`. When `[logging] directory` is set, a second
/// layer writes daily-rotated files without ANSI colors.
fn init_logging(verbose: u8, logging: &FileLoggingConfig) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let (file_layer, guard) = match &logging.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, &logging.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(guard)
}

fn config_report(cli: &Cli, config: &FileConfig, issues: &[ConfigIssue]) -> Result<ConfigReport> {
    let sources = if cli.no_config {
        Vec::new()
    } else {
        ConfigLoader::config_sources(cli.config.as_ref())
            .into_iter()
            .map(|(label, path, exists)| ConfigSource {
                label,
                path,
                exists,
            })
            .collect()
    };

    Ok(ConfigReport {
        sources,
        effective: serde_json::to_value(config).context("Failed to serialize configuration")?,
        issues: issues
            .iter()
            .map(|issue| {
                let severity = match issue.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                };
                format!("{}: {}", severity, issue.message)
            })
            .collect(),
    })
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Use cases bound to one repository
struct App<R: VotingRequestRepository + 'static> {
    create: CreateRequestUseCase<R>,
    manage: ManageRequestUseCase<R>,
    votes: CastVoteUseCase<R>,
    extensions: ManageExtensionsUseCase<R>,
    queries: QueryRequestsUseCase<R>,
    tallies: TallyRequestUseCase<R>,
    clock: Arc<dyn Clock>,
}

impl<R: VotingRequestRepository + 'static> App<R> {
    fn new(
        repository: Arc<R>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn BallotEventLogger>,
        defaults: DraftDefaults,
    ) -> Self {
        Self {
            create: CreateRequestUseCase::new(Arc::clone(&repository), Arc::clone(&clock))
                .with_defaults(defaults)
                .with_event_logger(Arc::clone(&events)),
            manage: ManageRequestUseCase::new(Arc::clone(&repository), Arc::clone(&clock))
                .with_defaults(defaults)
                .with_event_logger(Arc::clone(&events)),
            votes: CastVoteUseCase::new(Arc::clone(&repository), Arc::clone(&clock))
                .with_event_logger(Arc::clone(&events)),
            extensions: ManageExtensionsUseCase::new(Arc::clone(&repository), Arc::clone(&clock))
                .with_event_logger(events),
            queries: QueryRequestsUseCase::new(Arc::clone(&repository), Arc::clone(&clock)),
            tallies: TallyRequestUseCase::new(repository, Arc::clone(&clock)),
            clock,
        }
    }

    /// Administrator view of a request the command just changed
    fn admin_view(&self, request: &VotingRequest) -> RequestView {
        RequestView::build(request, &Audience::Administrator, self.clock.now())
    }

    async fn run(&self, command: &Command, formatter: &dyn OutputFormatter) -> Result<String> {
        let rendered = match command {
            Command::Create { file } => {
                let draft: RequestDraft = read_json(file).await?;
                let request = self.create.execute(draft).await?;
                formatter.request(&self.admin_view(&request))
            }
            Command::Update { id, file } => {
                let patch: RequestPatch = read_json(file).await?;
                let request = self.manage.update(id, patch).await?;
                formatter.request(&self.admin_view(&request))
            }
            Command::Publish { id } => {
                let request = self.manage.publish(id).await?;
                formatter.request(&self.admin_view(&request))
            }
            Command::Discard { id } => {
                let request = self.manage.discard(id).await?;
                formatter.request(&self.admin_view(&request))
            }
            Command::Show { id, audience } => {
                let view = self.queries.get(id, &audience.audience()).await?;
                formatter.request(&view)
            }
            Command::List { status, search } => {
                let mut filter = RequestFilter::default();
                if let Some(status) = status {
                    filter = filter.with_status(*status);
                }
                if let Some(search) = search {
                    filter = filter.with_search(search.clone());
                }
                formatter.summaries(&self.queries.list(&filter).await?)
            }
            Command::Vote {
                id,
                resolution,
                participant,
                choice,
            } => {
                let input = CastVoteInput::new(
                    id.clone(),
                    resolution.clone(),
                    participant.clone(),
                    *choice,
                );
                let vote = self.votes.execute(input).await?;
                formatter.vote(&VoteReceipt {
                    request_id: id.clone(),
                    resolution_id: resolution.clone(),
                    vote,
                })
            }
            Command::MyVotes { id, participant } => {
                let ballots = self.tallies.my_votes(id, participant).await?;
                formatter.own_ballots(id, participant, &ballots)
            }
            Command::Tally { id, audience } => {
                let tally = self.tallies.tally(id, &audience.audience()).await?;
                formatter.tally(&tally)
            }
            Command::Stats => formatter.stats(&self.queries.stats().await?),
            Command::Review(ReviewCommand::Enter { id, reason }) => {
                let request = self.manage.enter_review(id, reason.clone()).await?;
                formatter.request(&self.admin_view(&request))
            }
            Command::Review(ReviewCommand::Exit { id }) => {
                let request = self.manage.exit_review(id).await?;
                formatter.request(&self.admin_view(&request))
            }
            Command::Extension(ExtensionCommand::Request {
                id,
                participant,
                reason,
            }) => {
                let extension = self
                    .extensions
                    .request(id, participant, reason.clone())
                    .await?;
                formatter.extension(id, &extension)
            }
            Command::Extension(ExtensionCommand::Grant {
                id,
                extension,
                until,
            }) => {
                let extension = self.extensions.grant(id, extension, *until).await?;
                formatter.extension(id, &extension)
            }
            Command::Extension(ExtensionCommand::Reject { id, extension }) => {
                let extension = self.extensions.reject(id, extension).await?;
                formatter.extension(id, &extension)
            }
            Command::Shares { .. } | Command::Config => {
                return Err(anyhow!("{:?} does not use the request store", command));
            }
        };
        Ok(rendered)
    }
}
