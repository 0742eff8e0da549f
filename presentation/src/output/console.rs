//! Console output formatter for meeting results and workspace listings

use crate::output::formatter::OutputFormatter;
use boardroom_application::{ProviderCheck, WorkspaceSummary};
use boardroom_domain::{
    ActionItem, Decision, DispatchSettings, MeetingLog, MeetingResult, PrepOutcome,
    ProviderDescriptor,
};
use colored::Colorize;

/// Formats meeting results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete meeting result
    pub fn format(result: &MeetingResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Meeting Results"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Meeting:".cyan().bold(), result.title));
        output.push_str(&format!(
            "{} {}  {} {}\n",
            "Id:".cyan().bold(),
            result.meeting_id,
            "Status:".cyan().bold(),
            result.status
        ));

        // Phase 1: Async Preparation
        output.push_str(&Self::section_header("Phase 1: Async Preparation"));
        for prep in result.prep_results.iter() {
            let label = format!("── {} ({}) ──", prep.name, prep.role);
            match &prep.outcome {
                PrepOutcome::Prepared(text) => {
                    output.push_str(&format!("\n{}\n{}\n", label.yellow().bold(), text));
                }
                PrepOutcome::Failed(error) => {
                    output.push_str(&format!("\n{}\nError: {}\n", label.red().bold(), error));
                }
            }
        }

        // Phase 2: Sync Decision
        output.push_str(&Self::section_header("Phase 2: Sync Decision"));
        let mut current_round = 0;
        for entry in &result.discussion_log {
            if entry.round != current_round {
                current_round = entry.round;
                output.push_str(&format!("\n{}\n", format!("Round {}", current_round).bold()));
            }
            let name = result
                .prep_results
                .get(&entry.participant_id)
                .map(|p| p.name.as_str())
                .unwrap_or_else(|| entry.role.as_str());
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ({}) ──", name, entry.role).yellow().bold(),
                entry.content
            ));
        }

        // Synthesis
        output.push_str(&Self::section_header("Synthesis"));
        match (&result.synthesis, &result.synthesis_error) {
            (Some(synthesis), _) => output.push_str(&format!("\n{}\n", synthesis)),
            (None, Some(error)) => {
                output.push_str(&format!("\n{} {}\n", "Synthesis failed:".red().bold(), error))
            }
            (None, None) => output.push_str("\n(no synthesis)\n"),
        }

        output.push_str(&Self::outcomes(result));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &MeetingResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format decisions and action items only (concise output)
    pub fn format_summary(result: &MeetingResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            format!("=== {} ===", result.title).cyan().bold()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Meeting id:".dimmed(),
            result.meeting_id
        ));

        let failed: Vec<String> = result
            .failed_preparations()
            .map(|p| format!("{} ({})", p.name, p.role))
            .collect();
        if !failed.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Preparation failed:".yellow(),
                failed.join(", ")
            ));
        }
        if let Some(error) = &result.synthesis_error {
            output.push_str(&format!("{} {}\n", "Synthesis failed:".red(), error));
        }

        output.push_str(&Self::outcomes(result));
        output
    }

    fn outcomes(result: &MeetingResult) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", "Decisions:".green().bold()));
        if result.decisions.is_empty() {
            output.push_str("  (none)\n");
        }
        for decision in &result.decisions {
            output.push_str(&format!("  * {}\n", decision.description));
        }

        output.push_str(&format!("\n{}\n", "Action Items:".green().bold()));
        if result.action_items.is_empty() {
            output.push_str("  (none)\n");
        }
        for item in &result.action_items {
            output.push_str(&format!(
                "  * {} {}\n",
                item.description,
                format!("[owner: {}, deadline: {}]", item.owner, item.deadline).dimmed()
            ));
        }

        output
    }

    /// Format the provider registry
    pub fn format_providers(providers: &[ProviderDescriptor], settings: &DispatchSettings) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", "Providers:".cyan().bold()));
        if providers.is_empty() {
            output.push_str("  (none registered)\n");
        }
        for provider in providers {
            let state = if provider.enabled {
                "enabled".green()
            } else {
                "disabled".red()
            };
            output.push_str(&format!(
                "  {:<12} {:<20} {:<18} {:<24} priority {:<4} {}\n",
                provider.id,
                provider.name,
                provider.kind.to_string(),
                provider.default_model,
                provider.priority,
                state
            ));
            if let Some(endpoint) = &provider.endpoint_override {
                output.push_str(&format!("  {:<12} {}\n", "", endpoint.dimmed()));
            }
        }

        output.push('\n');
        output.push_str(&Self::format_settings(settings));
        output
    }

    /// Format dispatch settings
    pub fn format_settings(settings: &DispatchSettings) -> String {
        format!(
            "{}\n  auto_switch: {}\n  max_retries: {}\n  retry_delay: {}s\n  fallback_to_mock: {}\n",
            "Settings:".cyan().bold(),
            settings.auto_switch,
            settings.max_retries,
            settings.retry_delay_seconds,
            settings.fallback_to_mock
        )
    }

    /// Format one provider check line
    pub fn format_check(provider_id: &str, check: &ProviderCheck) -> String {
        let mark = if check.success {
            "v".green()
        } else {
            "x".red()
        };
        format!("{} {:<12} {}", mark, provider_id, check.message)
    }

    pub fn format_meetings(meetings: &[MeetingLog]) -> String {
        if meetings.is_empty() {
            return "No meetings saved.\n".to_string();
        }
        let mut output = String::new();
        for meeting in meetings {
            let state = if meeting.is_completed() {
                "completed".green()
            } else {
                "open".yellow()
            };
            output.push_str(&format!(
                "{}  {}  {:<18} {}  {}\n",
                meeting.id,
                meeting.started_at.format("%Y-%m-%d %H:%M"),
                meeting.meeting_type.to_string(),
                state,
                meeting.title.bold()
            ));
        }
        output
    }

    pub fn format_decisions(decisions: &[Decision]) -> String {
        if decisions.is_empty() {
            return "No decisions saved.\n".to_string();
        }
        let mut output = String::new();
        for decision in decisions {
            output.push_str(&format!(
                "{}  {:<10} {}\n",
                decision.id,
                format!("{:?}", decision.status).to_lowercase(),
                decision.title.bold()
            ));
        }
        output
    }

    pub fn format_action_items(items: &[ActionItem]) -> String {
        if items.is_empty() {
            return "No action items saved.\n".to_string();
        }
        let mut output = String::new();
        for item in items {
            output.push_str(&format!(
                "{}  {:<12} {} {}\n",
                item.id,
                format!("{:?}", item.status).to_lowercase(),
                item.description,
                format!("[owner: {}, deadline: {}]", item.owner, item.deadline).dimmed()
            ));
        }
        output
    }

    pub fn format_workspace(summary: &WorkspaceSummary) -> String {
        format!(
            "{}\n  meetings:     {} ({} completed)\n  decisions:    {} ({} pending)\n  action items: {} ({} open)\n",
            "Workspace:".cyan().bold(),
            summary.meetings,
            summary.completed_meetings,
            summary.decisions,
            summary.pending_decisions,
            summary.action_items,
            summary.open_action_items
        )
    }

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
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &MeetingResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &MeetingResult) -> String {
        Self::format_json(result)
    }

    fn format_summary(&self, result: &MeetingResult) -> String {
        Self::format_summary(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardroom_domain::{
        DecisionPhaseResult, DiscussionEntry, ExtractedActionItem, ExtractedDecision, MeetingId,
        ParticipantRole, PrepResult, PrepResults,
    };

    fn result() -> MeetingResult {
        colored::control::set_override(false);
        let mut preps = PrepResults::new();
        preps.insert(PrepResult::prepared("a1", ParticipantRole::Ceo, "Alex", "ready"));
        preps.insert(PrepResult::failed(
            "b2",
            ParticipantRole::Product,
            "Dana",
            "timeout",
        ));
        MeetingResult::completed(
            MeetingId::from("m-1"),
            "Q3 planning",
            preps,
            DecisionPhaseResult {
                discussion_log: vec![DiscussionEntry::new(
                    "a1",
                    ParticipantRole::Ceo,
                    "Let's focus",
                    1,
                )],
                decisions: vec![ExtractedDecision::new("Focus on retention")],
                action_items: vec![
                    ExtractedActionItem::new("Draft plan")
                        .with_owner("Product")
                        .with_deadline("Friday"),
                ],
                synthesis: Some("SUMMARY: aligned".to_string()),
                synthesis_error: None,
            },
        )
    }

    #[test]
    fn full_output_names_speakers_and_outcomes() {
        let text = ConsoleFormatter::format(&result());
        assert!(text.contains("Q3 planning"));
        assert!(text.contains("Alex (CEO)"));
        assert!(text.contains("Error: timeout"));
        assert!(text.contains("Round 1"));
        assert!(text.contains("Let's focus"));
        assert!(text.contains("* Focus on retention"));
        assert!(text.contains("owner: Product, deadline: Friday"));
    }

    #[test]
    fn summary_lists_failures_and_outcomes() {
        let text = ConsoleFormatter::format_summary(&result());
        assert!(text.contains("Preparation failed: Dana (Product)"));
        assert!(text.contains("* Draft plan"));
        assert!(!text.contains("Let's focus"));
    }

    #[test]
    fn summary_reports_synthesis_error() {
        let mut r = result();
        r.synthesis = None;
        r.synthesis_error = Some("facilitator has no inference".to_string());
        r.decisions.clear();
        let text = ConsoleFormatter::format_summary(&r);
        assert!(text.contains("Synthesis failed: facilitator has no inference"));
        assert!(text.contains("(none)"));
    }

    #[test]
    fn json_output_is_parseable() {
        let json = ConsoleFormatter::format_json(&result());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Q3 planning");
        assert_eq!(value["decisions"][0]["description"], "Focus on retention");
    }

    #[test]
    fn workspace_summary_counts() {
        colored::control::set_override(false);
        let summary = WorkspaceSummary {
            meetings: 2,
            completed_meetings: 1,
            decisions: 3,
            pending_decisions: 3,
            action_items: 4,
            open_action_items: 2,
        };
        let text = ConsoleFormatter::format_workspace(&summary);
        assert!(text.contains("meetings:     2 (1 completed)"));
        assert!(text.contains("action items: 4 (2 open)"));
    }
}
