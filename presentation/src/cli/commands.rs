//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for meeting results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Preparations, discussion, synthesis and outcomes
    Full,
    /// Only the decisions and action items
    Summary,
    /// JSON output
    Json,
}

/// Artifact collections that can be listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArtifactListKind {
    Meetings,
    Decisions,
    ActionItems,
}

/// Wire format accepted by `providers add --type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKindArg {
    Openai,
    OpenaiCompatible,
    Anthropic,
}

/// CLI arguments for boardroom
#[derive(Parser, Debug)]
#[command(name = "boardroom")]
#[command(author, version, about = "Role-based executive meetings run by LLM agents")]
#[command(long_about = r#"
Boardroom convenes LLM agents playing organizational roles (CEO, Board,
Strategy, Product, Engineering) and runs a structured meeting:

1. Async Preparation: every participant prepares independently
2. Sync Decision: two discussion rounds over a shared context
3. Synthesis: the CEO (or the first participant) extracts decisions and
   action items, which are saved to the workspace

Configuration files are loaded from (in priority order):
1. --config <path>                   Explicit config file
2. ./boardroom.toml                  Project-level config
3. ~/.config/boardroom/config.toml   Global config

Example:
  boardroom providers add --id oa --name OpenAI --type openai --api-key sk-... --model gpt-4o
  boardroom meeting run --title "Q3 planning" --type executive-review \
      --agenda "Roadmap" --participant ceo --participant product=Dana
  boardroom ask "Summarize the trade-offs of a monorepo" --stream
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,

    /// Provider registry file (overrides the configured location)
    #[arg(long, value_name = "PATH", global = true)]
    pub providers_file: Option<PathBuf>,

    /// Also write diagnostic logs to a daily-rolling file in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage inference providers
    #[command(subcommand)]
    Providers(ProvidersCommand),

    /// Send a single prompt through the provider registry
    Ask(AskArgs),

    /// Run meetings
    #[command(subcommand)]
    Meeting(MeetingCommand),

    /// Inspect saved meeting artifacts
    #[command(subcommand)]
    Artifacts(ArtifactsCommand),

    /// Show counts of saved meetings, decisions and action items
    Workspace,
}

#[derive(Subcommand, Debug)]
pub enum ProvidersCommand {
    /// List registered providers in priority order
    List,
    /// Register a provider (replaces one with the same id)
    Add(AddProviderArgs),
    /// Remove a provider
    Remove { id: String },
    /// Enable a provider
    Enable { id: String },
    /// Disable a provider
    Disable { id: String },
    /// Send a canary prompt to one provider, or to all of them
    Test { id: Option<String> },
    /// Show or change dispatch settings
    Settings(SettingsArgs),
}

#[derive(Args, Debug)]
pub struct AddProviderArgs {
    /// Unique provider id
    #[arg(long)]
    pub id: String,

    /// Display name (defaults to the id)
    #[arg(long)]
    pub name: Option<String>,

    /// Wire format
    #[arg(long = "type", value_enum)]
    pub kind: ProviderKindArg,

    /// API key
    #[arg(long)]
    pub api_key: String,

    /// Default model
    #[arg(long)]
    pub model: String,

    /// Additional models the provider offers
    #[arg(long = "extra-model", value_name = "MODEL")]
    pub extra_models: Vec<String>,

    /// Endpoint override (required for openai-compatible)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Lower values are tried first
    #[arg(long, default_value_t = 0)]
    pub priority: i32,

    /// Register the provider disabled
    #[arg(long)]
    pub disabled: bool,
}

#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Fail over to the next provider after retries are exhausted
    #[arg(long, value_name = "BOOL")]
    pub auto_switch: Option<bool>,

    /// Attempts per provider
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Base backoff delay in seconds
    #[arg(long, value_name = "SECONDS")]
    pub retry_delay: Option<f64>,

    /// Serve offline mock responses when no provider is enabled
    #[arg(long, value_name = "BOOL")]
    pub fallback_to_mock: Option<bool>,
}

impl SettingsArgs {
    /// Whether any setting was given on the command line.
    pub fn has_changes(&self) -> bool {
        self.auto_switch.is_some()
            || self.max_retries.is_some()
            || self.retry_delay.is_some()
            || self.fallback_to_mock.is_some()
    }
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The prompt to send
    pub prompt: String,

    /// Use only this provider
    #[arg(long, value_name = "ID")]
    pub provider: Option<String>,

    /// Print the response as it arrives
    #[arg(long)]
    pub stream: bool,
}

#[derive(Subcommand, Debug)]
pub enum MeetingCommand {
    /// Run a meeting end to end
    Run(RunMeetingArgs),
}

#[derive(Args, Debug)]
pub struct RunMeetingArgs {
    /// Meeting title
    #[arg(long)]
    pub title: String,

    /// Meeting type (executive-review, board-review, decision-meeting, team-checkin)
    #[arg(long = "type", value_name = "TYPE", default_value = "executive_review")]
    pub meeting_type: String,

    /// Agenda item (can be specified multiple times)
    #[arg(long, value_name = "ITEM")]
    pub agenda: Vec<String>,

    /// Participant as ROLE or ROLE=NAME (can be specified multiple times)
    #[arg(long, value_name = "ROLE[=NAME]", required = true)]
    pub participant: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    pub output: OutputFormat,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ArtifactsCommand {
    /// List saved artifacts of one kind
    List {
        #[arg(value_enum)]
        kind: ArtifactListKind,
    },
}

/// Split a `ROLE[=NAME]` participant argument.
pub fn parse_participant(spec: &str) -> (String, Option<String>) {
    match spec.split_once('=') {
        Some((role, name)) if !name.trim().is_empty() => {
            (role.trim().to_string(), Some(name.trim().to_string()))
        }
        Some((role, _)) => (role.trim().to_string(), None),
        None => (spec.trim().to_string(), None),
    }
}
