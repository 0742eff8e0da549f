//! CLI entrypoint for boardroom
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use boardroom_application::{
    ArtifactStore, LlmAgent, MeetingOrchestrator, MeetingProgressNotifier, NoProgress,
    Participant, ProviderRegistry, ResilientInvoker, RunMeetingError, WorkspaceSummary,
};
use boardroom_domain::{
    ActionItem, ArtifactKind, CompletionRequest, Decision, MeetingLog, MeetingType, Message,
    ParticipantRole, ProviderDescriptor, ProviderKind, ProvidersConfig, StreamEvent,
    validate_setup,
};
use boardroom_infrastructure::{
    ConfigLoader, FileConfig, HttpTransportFactory, InMemoryProviderStore, JsonArtifactStore,
    JsonProviderStore, JsonlConversationLogger, MockTransportFactory, mock_descriptor,
};
use boardroom_presentation::{
    AddProviderArgs, ArtifactListKind, ArtifactsCommand, AskArgs, Cli, Command, ConsoleFormatter,
    MeetingCommand, OutputFormat, ProgressReporter, ProviderKindArg, ProvidersCommand,
    RunMeetingArgs, SettingsArgs, SimpleProgress, parse_participant,
};
use clap::Parser;
use std::io::{IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    info!("Starting boardroom");

    // === Dependency Injection ===
    let providers_path = cli
        .providers_file
        .clone()
        .or_else(|| config.storage.providers_file.clone())
        .or_else(ConfigLoader::default_providers_path)
        .context("Could not locate a config directory; pass --providers-file")?;
    let registry = Arc::new(ProviderRegistry::load(Arc::new(JsonProviderStore::new(
        &providers_path,
    )))?);

    let cancellation = CancellationToken::new();
    tokio::spawn({
        let token = cancellation.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; cancelling");
                token.cancel();
            }
        }
    });

    match cli.command {
        Command::Providers(command) => {
            providers_command(command, registry, &config, cancellation).await
        }
        Command::Ask(args) => {
            let invoker = build_invoker(registry, &config, cancellation, true)?;
            ask(args, &invoker).await
        }
        Command::Meeting(MeetingCommand::Run(args)) => {
            let invoker = build_invoker(registry, &config, cancellation.clone(), true)?;
            run_meeting(args, invoker, &config, cancellation).await
        }
        Command::Artifacts(ArtifactsCommand::List { kind }) => {
            let store = JsonArtifactStore::new(config.storage.workspace_dir());
            list_artifacts(kind, &store)
        }
        Command::Workspace => {
            let store = JsonArtifactStore::new(config.storage.workspace_dir());
            let summary = WorkspaceSummary::collect(&store)?;
            print!("{}", ConsoleFormatter::format_workspace(&summary));
            Ok(())
        }
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins over `-v`. With a log directory, a daily-rolling file
/// receives the same events; the returned guard flushes it on exit.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "boardroom.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

/// Build the invoker over the registry.
///
/// With `allow_mock`, a registry that has nothing enabled and permits
/// `fallback_to_mock` is swapped for an in-memory one holding only the
/// offline mock provider.
fn build_invoker(
    registry: Arc<ProviderRegistry>,
    config: &FileConfig,
    cancellation: CancellationToken,
    allow_mock: bool,
) -> Result<Arc<ResilientInvoker>> {
    let invoker_config = config.invoker.to_invoker_config();
    let settings = registry.settings();

    if allow_mock && settings.fallback_to_mock && registry.enabled_providers().is_empty() {
        warn!("No provider is enabled; serving offline mock responses");
        eprintln!("No provider is enabled; using offline mock responses.");
        let mock_config = ProvidersConfig {
            providers: vec![mock_descriptor()],
            settings,
        };
        let mock_registry = Arc::new(ProviderRegistry::load(Arc::new(
            InMemoryProviderStore::new(mock_config),
        ))?);
        let invoker =
            ResilientInvoker::new(mock_registry, Arc::new(MockTransportFactory), invoker_config)
                .with_cancellation(cancellation);
        return Ok(Arc::new(invoker));
    }

    let invoker = ResilientInvoker::new(registry, Arc::new(HttpTransportFactory::new()), invoker_config)
        .with_cancellation(cancellation);
    Ok(Arc::new(invoker))
}

async fn providers_command(
    command: ProvidersCommand,
    registry: Arc<ProviderRegistry>,
    config: &FileConfig,
    cancellation: CancellationToken,
) -> Result<()> {
    match command {
        ProvidersCommand::List => {
            print!(
                "{}",
                ConsoleFormatter::format_providers(&registry.list_providers(), &registry.settings())
            );
            println!("\nRegistry file: {}", registry.location());
        }
        ProvidersCommand::Add(args) => {
            let id = args.id.clone();
            registry.add(descriptor_from_args(args))?;
            println!("Added provider {}", id);
        }
        ProvidersCommand::Remove { id } => {
            if !registry.remove(&id)? {
                bail!("Provider {} not found", id);
            }
            println!("Removed provider {}", id);
        }
        ProvidersCommand::Enable { id } => {
            if !registry.enable(&id)? {
                bail!("Provider {} not found", id);
            }
            println!("Enabled provider {}", id);
        }
        ProvidersCommand::Disable { id } => {
            if !registry.disable(&id)? {
                bail!("Provider {} not found", id);
            }
            println!("Disabled provider {}", id);
        }
        ProvidersCommand::Test { id } => {
            let invoker = build_invoker(registry, config, cancellation, false)?;
            match id {
                Some(id) => {
                    let check = invoker.test_provider(&id).await?;
                    println!("{}", ConsoleFormatter::format_check(&id, &check));
                    if !check.success {
                        bail!("Provider {} failed its check", id);
                    }
                }
                None => {
                    let results = invoker.test_all_providers().await;
                    if results.is_empty() {
                        println!("No providers registered.");
                    }
                    for (id, result) in results {
                        match result {
                            Ok(check) => println!("{}", ConsoleFormatter::format_check(&id, &check)),
                            Err(e) => println!("- {:<12} {}", id, e),
                        }
                    }
                }
            }
        }
        ProvidersCommand::Settings(args) => {
            if args.has_changes() {
                registry.update_settings(apply_settings(registry.settings(), &args))?;
                println!("Settings updated.");
            }
            print!("{}", ConsoleFormatter::format_settings(&registry.settings()));
        }
    }
    Ok(())
}

fn descriptor_from_args(args: AddProviderArgs) -> ProviderDescriptor {
    let kind = match args.kind {
        ProviderKindArg::Openai => ProviderKind::OpenAi,
        ProviderKindArg::OpenaiCompatible => ProviderKind::OpenAiCompatible,
        ProviderKindArg::Anthropic => ProviderKind::Anthropic,
    };
    let name = args.name.unwrap_or_else(|| args.id.clone());
    let mut models = vec![args.model.clone()];
    models.extend(args.extra_models.into_iter().filter(|m| *m != args.model));

    let mut descriptor = ProviderDescriptor::new(args.id, name, kind, args.api_key, args.model)
        .with_priority(args.priority)
        .with_models(models);
    if let Some(base_url) = args.base_url {
        descriptor = descriptor.with_endpoint(base_url);
    }
    if args.disabled {
        descriptor = descriptor.disabled();
    }
    descriptor
}

fn apply_settings(
    mut settings: boardroom_domain::DispatchSettings,
    args: &SettingsArgs,
) -> boardroom_domain::DispatchSettings {
    if let Some(auto_switch) = args.auto_switch {
        settings.auto_switch = auto_switch;
    }
    if let Some(max_retries) = args.max_retries {
        settings.max_retries = max_retries;
    }
    if let Some(retry_delay) = args.retry_delay {
        settings.retry_delay_seconds = retry_delay;
    }
    if let Some(fallback) = args.fallback_to_mock {
        settings.fallback_to_mock = fallback;
    }
    settings
}

async fn ask(args: AskArgs, invoker: &ResilientInvoker) -> Result<()> {
    let request = CompletionRequest::new(vec![Message::user(&args.prompt)])
        .with_temperature(invoker.config().temperature);

    if !args.stream {
        let result = invoker.complete(&request, args.provider.as_deref()).await?;
        debug!("Token usage: {:?}", result.usage);
        println!("{}", result.content);
        return Ok(());
    }

    let mut handle = invoker.stream(&request, args.provider.as_deref())?;
    let mut stdout = std::io::stdout();
    while let Some(event) = handle.next_event().await {
        match event {
            StreamEvent::Delta(chunk) => {
                print!("{}", chunk);
                stdout.flush()?;
            }
            StreamEvent::Restarted { provider, reason } => {
                println!();
                eprintln!("[restarting on {} after: {}]", provider, reason);
            }
            StreamEvent::Completed(_) => {
                println!();
                return Ok(());
            }
            StreamEvent::Error(e) => {
                println!();
                bail!("{}", e);
            }
        }
    }
    println!();
    bail!("Stream ended without completion")
}

async fn run_meeting(
    args: RunMeetingArgs,
    invoker: Arc<ResilientInvoker>,
    config: &FileConfig,
    cancellation: CancellationToken,
) -> Result<()> {
    let meeting_type: MeetingType = args.meeting_type.parse()?;
    let seats: Vec<(ParticipantRole, Option<String>)> = args
        .participant
        .iter()
        .map(|spec| {
            let (role, name) = parse_participant(spec);
            let role: ParticipantRole = role.parse().unwrap_or_else(|never| match never {});
            (role, name)
        })
        .collect();

    let roles: Vec<ParticipantRole> = seats.iter().map(|(role, _)| role.clone()).collect();
    let issues = validate_setup(&args.title, &args.agenda, &roles);
    for issue in issues.iter().filter(|i| !i.is_error()) {
        eprintln!("warning: {}", issue.message);
    }
    let errors: Vec<&str> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.message.as_str())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid meeting setup: {}", errors.join("; "));
    }

    let participants: Vec<Arc<dyn Participant>> = seats
        .into_iter()
        .map(|(role, name)| {
            let mut agent = LlmAgent::new(role, Arc::clone(&invoker));
            if let Some(name) = name {
                agent = agent.with_name(name);
            }
            Arc::new(agent) as Arc<dyn Participant>
        })
        .collect();

    let store = Arc::new(JsonArtifactStore::new(config.storage.workspace_dir()));
    let mut orchestrator = MeetingOrchestrator::new(store).with_cancellation(cancellation);
    if let Some(dir) = &config.logging.transcript_dir {
        match JsonlConversationLogger::in_dir(dir) {
            Ok(logger) => {
                info!("Writing meeting transcript to {}", logger.path().display());
                orchestrator = orchestrator.with_logger(Arc::new(logger));
            }
            Err(e) => warn!("Transcript disabled; could not write to {}: {}", dir.display(), e),
        }
    }

    let context =
        orchestrator.create_meeting(&args.title, meeting_type, args.agenda.clone(), participants)?;

    if !args.quiet {
        println!();
        println!("Meeting: {} ({})", context.title, context.meeting_type);
        println!("Participants: {}", context.participant_names().join(", "));
        println!();
    }

    let reporter = ProgressReporter::new();
    let progress: &dyn MeetingProgressNotifier = if args.quiet {
        &NoProgress
    } else if std::io::stderr().is_terminal() {
        &reporter
    } else {
        &SimpleProgress
    };

    let result = match orchestrator
        .run_meeting_with_progress(&context.meeting_id, progress)
        .await
    {
        Ok(result) => result,
        Err(RunMeetingError::Cancelled) => {
            bail!("Meeting {} was cancelled", context.meeting_id)
        }
        Err(e) => return Err(e.into()),
    };

    let output = match args.output {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };
    println!("{}", output);

    Ok(())
}

fn list_artifacts(kind: ArtifactListKind, store: &dyn ArtifactStore) -> Result<()> {
    let output = match kind {
        ArtifactListKind::Meetings => {
            let mut meetings: Vec<MeetingLog> = store.list_records(ArtifactKind::Meeting)?;
            meetings.sort_by_key(|m| m.started_at);
            ConsoleFormatter::format_meetings(&meetings)
        }
        ArtifactListKind::Decisions => {
            let mut decisions: Vec<Decision> = store.list_records(ArtifactKind::Decision)?;
            decisions.sort_by_key(|d| d.created_at);
            ConsoleFormatter::format_decisions(&decisions)
        }
        ArtifactListKind::ActionItems => {
            let mut items: Vec<ActionItem> = store.list_records(ArtifactKind::ActionItem)?;
            items.sort_by_key(|a| a.created_at);
            ConsoleFormatter::format_action_items(&items)
        }
    };
    print!("{}", output);
    Ok(())
}
