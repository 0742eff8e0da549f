//! Prompt templates for the meeting flow

use crate::meeting::types::{MeetingType, ParticipantRole};

/// Number of round-robin discussion rounds in the Sync Decision phase
pub const DISCUSSION_ROUNDS: u8 = 2;

/// Templates for generating prompts at each meeting stage
pub struct MeetingPromptTemplate;

impl MeetingPromptTemplate {
    /// Prompt for the Async Preparation phase
    pub fn preparation(
        title: &str,
        meeting_type: MeetingType,
        role: &ParticipantRole,
        agenda: &[String],
    ) -> String {
        format!(
            r#"You are preparing for a meeting: "{title}"

Your role: {role}
Meeting type: {meeting_type}

Agenda items:
{agenda}

Please prepare:
1. KEY_POINTS: [What you want to communicate]
2. RECOMMENDATIONS: [Your suggested actions]
3. CONCERNS: [Risks or issues to raise]
4. QUESTIONS: [What you need clarified]
5. DATA: [Facts or analysis to share]

Be concise but thorough. Your preparation will be shared with other participants.
"#,
            agenda = bullet_list(agenda),
        )
    }

    /// Opening of the shared discussion context
    pub fn discussion_header(title: &str) -> String {
        format!("Meeting: {}\n\nPreparations:\n", title)
    }

    /// One participant's preparation inside the discussion context
    pub fn preparation_block(name: &str, role: &ParticipantRole, preparation: &str) -> String {
        format!("\n{} ({}):\n{}\n", name, role, preparation)
    }

    /// A successful discussion turn appended to the context
    pub fn discussion_turn(name: &str, response: &str) -> String {
        format!("\n\n{}: {}", name, response)
    }

    /// A failed discussion turn appended to the context
    pub fn discussion_turn_failed(name: &str, error: &str) -> String {
        format!("\n\n{}: [Error: {}]", name, error)
    }

    /// What each round should focus on (1-based round)
    pub fn round_focus(round: u8) -> &'static str {
        if round <= 1 {
            "Share your perspective and react to others' inputs"
        } else {
            "Focus on converging toward decisions and addressing disagreements"
        }
    }

    /// Prompt for one discussion turn (1-based round)
    pub fn discussion(title: &str, role: &ParticipantRole, round: u8, context: &str) -> String {
        format!(
            r#"You are in a meeting: "{title}"
Your role: {role}
Round: {round} of {DISCUSSION_ROUNDS}

Discussion so far:
{context}

This round, focus on: {focus}

Provide your contribution:
1. REACTION: [Your response to what others said]
2. POSITION: [Your stance on key issues]
3. PROPOSAL: [Specific suggestions]
4. CONCERNS: [Any remaining issues]

Be constructive and aim for progress toward decisions.
"#,
            focus = Self::round_focus(round),
        )
    }

    /// Prompt for the facilitator's synthesis
    pub fn synthesis(title: &str, agenda: &[String], context: &str) -> String {
        format!(
            r#"As the meeting facilitator, synthesize the following discussion and produce clear outputs.

Meeting: {title}
Agenda: {agenda}

Discussion:
{context}

Provide:
1. SUMMARY: [Brief summary of key points discussed]
2. DECISIONS: [Clear decisions made - format as "DECISION: [description]"]
3. ACTION_ITEMS: [Specific tasks - format as "ACTION: [description] | OWNER: [role] | DEADLINE: [when]"]
4. OPEN_QUESTIONS: [Issues not resolved]
5. NEXT_STEPS: [What happens next]
"#,
            agenda = agenda.join("; "),
        )
    }
}

pub(crate) fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preparation_embeds_meeting_details() {
        let prompt = MeetingPromptTemplate::preparation(
            "Q3 Planning",
            MeetingType::ExecutiveReview,
            &ParticipantRole::Product,
            &["Roadmap".to_string(), "Hiring".to_string()],
        );
        assert!(prompt.contains("\"Q3 Planning\""));
        assert!(prompt.contains("Your role: Product"));
        assert!(prompt.contains("Meeting type: executive_review"));
        assert!(prompt.contains("- Roadmap\n- Hiring"));
    }

    #[test]
    fn discussion_focus_changes_by_round() {
        let r1 = MeetingPromptTemplate::discussion("T", &ParticipantRole::Ceo, 1, "ctx");
        let r2 = MeetingPromptTemplate::discussion("T", &ParticipantRole::Ceo, 2, "ctx");
        assert!(r1.contains("Round: 1 of 2"));
        assert!(r1.contains("react to others' inputs"));
        assert!(r2.contains("Round: 2 of 2"));
        assert!(r2.contains("converging toward decisions"));
    }

    #[test]
    fn synthesis_requests_parseable_format() {
        let prompt = MeetingPromptTemplate::synthesis("T", &["A".to_string()], "ctx");
        assert!(prompt.contains("\"DECISION: [description]\""));
        assert!(prompt.contains("| OWNER: [role] | DEADLINE: [when]"));
    }

    #[test]
    fn context_fragments() {
        assert_eq!(
            MeetingPromptTemplate::discussion_header("Pricing"),
            "Meeting: Pricing\n\nPreparations:\n"
        );
        assert_eq!(
            MeetingPromptTemplate::preparation_block("Ann", &ParticipantRole::Ceo, "plan"),
            "\nAnn (CEO):\nplan\n"
        );
        assert_eq!(
            MeetingPromptTemplate::discussion_turn_failed("Bob", "timeout"),
            "\n\nBob: [Error: timeout]"
        );
    }
}
