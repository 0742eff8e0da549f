//! Pre-flight checks for a meeting setup.
//!
//! A meeting can be created with almost any combination of title, agenda and
//! participants. Some combinations can't produce anything useful, others work
//! but may not behave as expected. [`validate_setup`] reports both as
//! structured issues with severity levels so the caller decides what to do.

use super::types::ParticipantRole;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the meeting cannot produce an outcome.
    Error,
    /// Non-fatal: the meeting runs but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// No participants at all.
    NoParticipants,
    /// Title is blank.
    EmptyTitle,
    /// Agenda has no items.
    EmptyAgenda,
    /// No CEO; the first participant facilitates instead.
    NoIntegrator,
    /// More than one CEO; only the first facilitates.
    MultipleIntegrators,
}

/// A detected issue in a meeting setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Check a meeting setup before it is created.
pub fn validate_setup(
    title: &str,
    agenda: &[String],
    roles: &[ParticipantRole],
) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if title.trim().is_empty() {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::EmptyTitle,
            "Meeting title must not be empty",
        ));
    }

    if roles.is_empty() {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::NoParticipants,
            "A meeting needs at least one participant",
        ));
        return issues;
    }

    if agenda.iter().all(|item| item.trim().is_empty()) {
        issues.push(ConfigIssue::warning(
            ConfigIssueCode::EmptyAgenda,
            "Agenda is empty; participants will prepare without topics",
        ));
    }

    match roles.iter().filter(|r| r.is_integrator()).count() {
        0 => issues.push(ConfigIssue::warning(
            ConfigIssueCode::NoIntegrator,
            format!(
                "No CEO among participants; {} will facilitate the synthesis",
                roles[0]
            ),
        )),
        1 => {}
        n => issues.push(ConfigIssue::warning(
            ConfigIssueCode::MultipleIntegrators,
            format!("{} CEOs among participants; only the first facilitates", n),
        )),
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agenda() -> Vec<String> {
        vec!["Budget".to_string()]
    }

    #[test]
    fn typical_setup_is_valid() {
        let roles = [ParticipantRole::Ceo, ParticipantRole::Product];
        assert!(validate_setup("Review", &agenda(), &roles).is_empty());
    }

    #[test]
    fn no_participants_is_an_error() {
        let issues = validate_setup("Review", &agenda(), &[]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::NoParticipants);
        assert!(issues[0].is_error());
    }

    #[test]
    fn missing_ceo_warns_with_fallback_facilitator() {
        let roles = [ParticipantRole::Strategy, ParticipantRole::Product];
        let issues = validate_setup("Review", &agenda(), &roles);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].message.contains("Strategy will facilitate"));
    }

    #[test]
    fn multiple_ceos_warn() {
        let roles = [ParticipantRole::Ceo, ParticipantRole::Ceo];
        let issues = validate_setup("Review", &agenda(), &roles);
        assert_eq!(issues[0].code, ConfigIssueCode::MultipleIntegrators);
    }

    #[test]
    fn blank_title_and_agenda() {
        let issues = validate_setup("  ", &[], &[ParticipantRole::Ceo]);
        let codes: Vec<_> = issues.iter().map(|i| i.code).collect();
        assert_eq!(codes, vec![ConfigIssueCode::EmptyTitle, ConfigIssueCode::EmptyAgenda]);
    }
}
