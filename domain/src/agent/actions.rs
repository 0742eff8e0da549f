//! Role-specific actions an agent can perform outside of meetings.
//!
//! Each variant belongs to exactly one [`ParticipantRole`]; an agent only
//! accepts actions of its own role.

use crate::meeting::types::ParticipantRole;
use serde::{Deserialize, Serialize};

/// A typed request for a role-specific piece of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AgentAction {
    // Board of Directors
    ReviewDecision {
        title: String,
        description: String,
        rationale: String,
        #[serde(default)]
        alternatives: Vec<String>,
    },
    AssessRisk {
        proposal: String,
    },

    // CEO
    Prioritize {
        initiatives: Vec<String>,
        #[serde(default)]
        strategy: String,
        #[serde(default)]
        constraints: String,
    },
    ProposeDecision {
        topic: String,
        #[serde(default)]
        options: Vec<String>,
        #[serde(default)]
        context: String,
    },
    ResolveConflict {
        parties: Vec<String>,
        conflict: String,
    },

    // Strategy
    MarketAnalysis {
        market: String,
        #[serde(default)]
        context: String,
    },
    ScenarioPlanning {
        topic: String,
        #[serde(default = "default_time_horizon")]
        time_horizon: String,
    },

    // Product
    DefineVision {
        market: String,
        #[serde(default)]
        context: String,
    },
    WritePrd {
        feature: String,
        #[serde(default)]
        context: String,
    },

    // Engineering
    DesignArchitecture {
        requirements: String,
        #[serde(default)]
        constraints: String,
    },
    EstimateEffort {
        scope: String,
        #[serde(default)]
        team_capacity: String,
    },
}

fn default_time_horizon() -> String {
    "3 years".to_string()
}

impl AgentAction {
    /// Snake-case action name, as used in serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            AgentAction::ReviewDecision { .. } => "review_decision",
            AgentAction::AssessRisk { .. } => "assess_risk",
            AgentAction::Prioritize { .. } => "prioritize",
            AgentAction::ProposeDecision { .. } => "propose_decision",
            AgentAction::ResolveConflict { .. } => "resolve_conflict",
            AgentAction::MarketAnalysis { .. } => "market_analysis",
            AgentAction::ScenarioPlanning { .. } => "scenario_planning",
            AgentAction::DefineVision { .. } => "define_vision",
            AgentAction::WritePrd { .. } => "write_prd",
            AgentAction::DesignArchitecture { .. } => "design_architecture",
            AgentAction::EstimateEffort { .. } => "estimate_effort",
        }
    }

    /// The only role allowed to perform this action.
    pub fn role(&self) -> ParticipantRole {
        match self {
            AgentAction::ReviewDecision { .. } | AgentAction::AssessRisk { .. } => {
                ParticipantRole::Board
            }
            AgentAction::Prioritize { .. }
            | AgentAction::ProposeDecision { .. }
            | AgentAction::ResolveConflict { .. } => ParticipantRole::Ceo,
            AgentAction::MarketAnalysis { .. } | AgentAction::ScenarioPlanning { .. } => {
                ParticipantRole::Strategy
            }
            AgentAction::DefineVision { .. } | AgentAction::WritePrd { .. } => {
                ParticipantRole::Product
            }
            AgentAction::DesignArchitecture { .. } | AgentAction::EstimateEffort { .. } => {
                ParticipantRole::Engineering
            }
        }
    }

    /// Thought recorded once the action completes.
    pub fn thought(&self) -> String {
        match self {
            AgentAction::ReviewDecision { title, .. } => format!("Reviewed decision: {}", title),
            AgentAction::AssessRisk { proposal } => {
                let head: String = proposal.chars().take(40).collect();
                format!("Assessed risk for: {}", head)
            }
            AgentAction::Prioritize { .. } => "Prioritized initiatives".to_string(),
            AgentAction::ProposeDecision { topic, .. } => format!("Proposed decision: {}", topic),
            AgentAction::ResolveConflict { .. } => "Resolved conflict".to_string(),
            AgentAction::MarketAnalysis { market, .. } => format!("Analyzed market: {}", market),
            AgentAction::ScenarioPlanning { topic, .. } => {
                format!("Developed scenarios for: {}", topic)
            }
            AgentAction::DefineVision { .. } => "Defined product vision".to_string(),
            AgentAction::WritePrd { feature, .. } => format!("Wrote PRD for: {}", feature),
            AgentAction::DesignArchitecture { .. } => "Designed architecture".to_string(),
            AgentAction::EstimateEffort { .. } => "Estimated effort".to_string(),
        }
    }
}

/// Result of a completed action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action: String,
    pub output: String,
}

impl ActionOutcome {
    pub fn new(action: &AgentAction, output: impl Into<String>) -> Self {
        Self {
            action: action.name().to_string(),
            output: output.into(),
        }
    }
}
