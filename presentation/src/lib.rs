//! Presentation layer for boardroom
//!
//! This crate contains CLI definitions, output formatters,
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{
    AddProviderArgs, ArtifactListKind, ArtifactsCommand, AskArgs, Cli, Command, MeetingCommand,
    OutputFormat, ProviderKindArg, ProvidersCommand, RunMeetingArgs, SettingsArgs,
    parse_participant,
};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
