//! Parsing of the facilitator's free-text synthesis.
//!
//! The synthesis prompt asks for one item per line using fixed prefixes:
//!
//! ```text
//! DECISION: Adopt the new pricing model
//! ACTION: Draft rollout plan | OWNER: Product | DEADLINE: next Friday
//! ```
//!
//! Lines are matched on their literal prefix after trimming. Anything else
//! (summary prose, open questions, next steps) is ignored. Parsing never fails.

use super::value_objects::{ExtractedActionItem, ExtractedDecision};

const DECISION_PREFIXES: [&str; 2] = ["DECISION:", "2. DECISION:"];
const ACTION_PREFIXES: [&str; 2] = ["ACTION:", "3. ACTION:"];
const OWNER_MARKER: &str = "| OWNER:";
const DEADLINE_MARKER: &str = "| DEADLINE:";

/// Decisions and action items extracted from a synthesis, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSynthesis {
    pub decisions: Vec<ExtractedDecision>,
    pub action_items: Vec<ExtractedActionItem>,
}

impl ParsedSynthesis {
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty() && self.action_items.is_empty()
    }
}

/// Extract decisions and action items from a synthesis text.
pub fn parse_synthesis(synthesis: &str) -> ParsedSynthesis {
    let mut parsed = ParsedSynthesis::default();

    for line in synthesis.lines().map(str::trim) {
        if starts_with_any(line, &DECISION_PREFIXES) {
            parsed
                .decisions
                .push(ExtractedDecision::new(after_first_colon(line)));
        } else if starts_with_any(line, &ACTION_PREFIXES) {
            parsed.action_items.push(parse_action(after_first_colon(line)));
        }
    }

    parsed
}

fn starts_with_any(line: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| line.starts_with(p))
}

fn after_first_colon(line: &str) -> &str {
    line.split_once(':').map_or(line, |(_, rest)| rest).trim()
}

fn parse_action(text: &str) -> ExtractedActionItem {
    let mut parts = text.split(OWNER_MARKER);
    let description = parts.next().unwrap_or_default().trim();
    let Some(rest) = parts.next() else {
        return ExtractedActionItem::new(description);
    };

    let mut rest_parts = rest.split(DEADLINE_MARKER);
    let owner = rest_parts.next().unwrap_or_default().trim();
    let deadline = rest_parts.next().unwrap_or_default().trim();

    ExtractedActionItem::new(description)
        .with_owner(owner)
        .with_deadline(deadline)
}
