//! Output formatter trait

use boardroom_domain::MeetingResult;

/// Trait for formatting meeting results
pub trait OutputFormatter {
    /// Format the complete meeting result
    fn format(&self, result: &MeetingResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &MeetingResult) -> String;

    /// Format decisions and action items only
    fn format_summary(&self, result: &MeetingResult) -> String;
}
