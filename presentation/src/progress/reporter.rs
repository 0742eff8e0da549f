//! Progress reporting for meeting runs

use boardroom_application::MeetingProgressNotifier;
use boardroom_domain::{MeetingPhase, ParticipantRole};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress during a meeting with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
    synthesis_spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
            synthesis_spinner: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_display_name(phase: MeetingPhase) -> &'static str {
        match phase {
            MeetingPhase::AsyncPrep => "Phase 1: Async Preparation",
            MeetingPhase::SyncDecision => "Phase 2: Sync Decision",
            MeetingPhase::Completed => "Completed",
        }
    }

    fn phase_short_name(phase: MeetingPhase) -> &'static str {
        match phase {
            MeetingPhase::AsyncPrep => "Phase 1",
            MeetingPhase::SyncDecision => "Phase 2",
            MeetingPhase::Completed => "Meeting",
        }
    }

    fn turn_status(name: &str, role: &ParticipantRole, success: bool) -> String {
        if success {
            format!("{} {} ({})", "v".green(), name, role)
        } else {
            format!("{} {} ({})", "x".red(), name, role)
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MeetingProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: MeetingPhase, total_turns: usize) {
        let pb = self.multi.add(ProgressBar::new(total_turns as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_display_name(phase).to_string());
        pb.set_message("Starting...");
        pb.enable_steady_tick(Duration::from_millis(120));

        *self.phase_bar.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
    }

    fn on_turn_complete(
        &self,
        _phase: MeetingPhase,
        name: &str,
        role: &ParticipantRole,
        success: bool,
    ) {
        if let Some(pb) = self
            .phase_bar
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            pb.set_message(Self::turn_status(name, role, success));
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: MeetingPhase) {
        if let Some(pb) = self
            .phase_bar
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            let phase_name = Self::phase_short_name(phase);
            pb.finish_with_message(format!("{} complete!", phase_name.green()));
        }
    }

    fn on_round_start(&self, round: u8) {
        if let Some(pb) = self
            .phase_bar
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            pb.set_message(format!("Round {}", round));
        }
    }

    fn on_synthesis_start(&self, facilitator: &str) {
        let spinner = self.multi.add(ProgressBar::new_spinner());
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix("Synthesis");
        spinner.set_message(format!("{} is summarizing...", facilitator));
        spinner.enable_steady_tick(Duration::from_millis(120));

        *self
            .synthesis_spinner
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(spinner);
    }

    fn on_synthesis_complete(&self, success: bool) {
        if let Some(spinner) = self
            .synthesis_spinner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            if success {
                spinner.finish_with_message(format!("{}", "done".green()));
            } else {
                spinner.finish_with_message(format!("{}", "failed".red()));
            }
        }
    }
}

/// Plain progress lines on stderr, for non-terminal output
pub struct SimpleProgress;

impl MeetingProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: MeetingPhase, total_turns: usize) {
        eprintln!(
            "{} {} ({} turns)",
            "->".cyan(),
            ProgressReporter::phase_display_name(phase).bold(),
            total_turns
        );
    }

    fn on_turn_complete(
        &self,
        _phase: MeetingPhase,
        name: &str,
        role: &ParticipantRole,
        success: bool,
    ) {
        if success {
            eprintln!("  {} {} ({})", "v".green(), name, role);
        } else {
            eprintln!("  {} {} ({}) (failed)", "x".red(), name, role);
        }
    }

    fn on_phase_complete(&self, _phase: MeetingPhase) {
        eprintln!();
    }

    fn on_round_start(&self, round: u8) {
        eprintln!("  {} Round {}", "-".dimmed(), round);
    }

    fn on_synthesis_start(&self, facilitator: &str) {
        eprintln!("{} Synthesis by {}", "->".cyan(), facilitator.bold());
    }

    fn on_synthesis_complete(&self, success: bool) {
        if !success {
            eprintln!("  {} synthesis failed", "x".red());
        }
    }
}
