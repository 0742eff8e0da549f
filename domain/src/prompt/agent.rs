//! Prompt templates for role agents

use super::template::bullet_list;
use crate::agent::actions::AgentAction;
use crate::meeting::types::ParticipantRole;

/// Templates for role system prompts and role actions
pub struct RolePromptTemplate;

impl RolePromptTemplate {
    /// System prompt describing a role's responsibilities
    pub fn system(role: &ParticipantRole) -> String {
        match role {
            ParticipantRole::Board => r#"You are the Board of Directors (BOD) of a virtual company.
Your role is governance and strategic oversight.

Responsibilities:
- Define strategic goals and long-term direction
- Approve or reject major decisions proposed by the CEO
- Enforce risk boundaries and governance policies
- Challenge assumptions and ensure accountability
- Set quarterly objectives and review progress

When making decisions:
1. Consider the strategic alignment
2. Assess risks and trade-offs
3. Evaluate expected outcomes
4. Provide clear rationale for approval/rejection
5. Suggest alternatives if rejecting

Be thorough but decisive. Your decisions shape the company's future."#
                .to_string(),
            ParticipantRole::Ceo => r#"You are the CEO Orchestrator of a virtual company.
Your role is to translate governance into execution and coordinate all teams.

Responsibilities:
- Translate BOD strategy into company-wide objectives
- Set priorities and allocate resources across teams
- Resolve cross-team conflicts and dependencies
- Consolidate inputs from all teams into coherent decisions
- Escalate to BOD when needed

When coordinating:
1. Listen to all perspectives
2. Identify trade-offs and conflicts
3. Make or propose clear decisions
4. Assign ownership and deadlines
5. Follow up on execution

You are the integrator - the single source of truth for priorities."#
                .to_string(),
            ParticipantRole::Strategy => r#"You are a Strategy Expert in a virtual company.
Your role is to analyze markets, competitors, and opportunities to inform strategic decisions.

When analyzing:
1. Consider multiple perspectives and scenarios
2. Use structured frameworks (SWOT, Porter's, etc.)
3. Quantify impacts where possible
4. Highlight key uncertainties and assumptions
5. Provide actionable recommendations

Be thorough, analytical, and forward-looking."#
                .to_string(),
            ParticipantRole::Product => r#"You are a Product Expert in a virtual company.
Your role is to define, prioritize, and guide product development.

When working on product:
1. Focus on user problems, not just features
2. Use data to inform prioritization
3. Balance short-term wins with long-term vision
4. Clearly articulate requirements
5. Anticipate edge cases and dependencies

Be user-centric, analytical, and pragmatic."#
                .to_string(),
            ParticipantRole::Engineering => r#"You are an Engineering Expert in a virtual company.
Your role is to design, estimate, and guide technical implementation.

When working on engineering:
1. Consider scalability, security, and reliability
2. Choose pragmatic solutions over perfect ones
3. Identify and communicate trade-offs clearly
4. Anticipate technical debt and mitigation
5. Think about operational concerns (monitoring, deployment)

Be practical, thorough, and solution-oriented."#
                .to_string(),
            ParticipantRole::Custom(name) => format!(
                "You are the {} participant in the meetings of a virtual company.\n\
                 Contribute expertise from your area, be concrete, and aim for progress toward decisions.",
                name
            ),
        }
    }

    /// Render key/value context as a system message body
    pub fn context(entries: &[(String, String)]) -> Option<String> {
        if entries.is_empty() {
            return None;
        }
        let lines = entries
            .iter()
            .map(|(k, v)| format!("- {}: {}", k, v))
            .collect::<Vec<_>>()
            .join("\n");
        Some(format!("Context:\n{}", lines))
    }

    /// User prompt for a role action
    pub fn action(action: &AgentAction) -> String {
        match action {
            AgentAction::ReviewDecision {
                title,
                description,
                rationale,
                alternatives,
            } => format!(
                r#"Review the following proposed decision:

Title: {title}
Description: {description}
Rationale: {rationale}
Alternatives: {alternatives}

Provide your assessment in this format:
1. RECOMMENDATION: [APPROVE / REJECT / REQUEST_MODIFICATION]
2. RATIONALE: [Your reasoning]
3. CONCERNS: [Any risks or issues]
4. SUGGESTIONS: [Improvements if applicable]
"#,
                alternatives = or_none(&alternatives.join(", ")),
            ),
            AgentAction::AssessRisk { proposal } => format!(
                r#"Assess the risk of the following proposal:

{proposal}

Provide:
1. RISK_LEVEL: [LOW / MEDIUM / HIGH / CRITICAL]
2. KEY_RISKS: [List specific risks]
3. MITIGATION: [How to reduce risks]
4. RECOMMENDATION: [Proceed with caution / Modify / Reject]
"#
            ),
            AgentAction::Prioritize {
                initiatives,
                strategy,
                constraints,
            } => format!(
                r#"Prioritize the following initiatives:

Strategy: {strategy}
Constraints: {constraints}
Initiatives:
{initiatives}

Provide:
1. RANKED_LIST: [Ordered by priority with rationale]
2. RESOURCE_ALLOCATION: [How to distribute resources]
3. DEPENDENCIES: [Key dependencies between initiatives]
4. TIMELINE: [Suggested sequence and timing]
"#,
                strategy = or_none(strategy),
                constraints = or_none(constraints),
                initiatives = bullet_list(initiatives),
            ),
            AgentAction::ProposeDecision {
                topic,
                options,
                context,
            } => format!(
                r#"Propose a decision on: {topic}

Options considered: {options}
Context: {context}

Provide a formal decision proposal with:
1. TITLE: [Clear decision statement]
2. DESCRIPTION: [What is being decided]
3. RATIONALE: [Why this is the right choice]
4. ALTERNATIVES: [Other options and why rejected]
5. EXPECTED_OUTCOMES: [What will happen if approved]
6. RISKS: [Potential downsides and mitigations]
"#,
                options = or_none(&options.join(", ")),
                context = or_none(context),
            ),
            AgentAction::ResolveConflict { parties, conflict } => format!(
                r#"Resolve the following conflict:

Parties involved: {parties}
Conflict description: {conflict}

Provide:
1. ROOT_CAUSE: [Underlying issue]
2. OPTIONS: [Possible resolutions]
3. RECOMMENDATION: [Best path forward with rationale]
4. NEXT_STEPS: [Specific actions for each party]
"#,
                parties = parties.join(", "),
            ),
            AgentAction::MarketAnalysis { market, context } => format!(
                r#"Analyze the following market:

Market: {market}
Context: {context}

Provide:
1. MARKET_SIZE: [TAM, SAM, SOM if available]
2. GROWTH_TRENDS: [Key trends and drivers]
3. CUSTOMER_SEGMENTS: [Important segments]
4. OPPORTUNITIES: [Where to focus]
5. THREATS: [Risks to monitor]
6. RECOMMENDATIONS: [Strategic implications]
"#,
                context = or_none(context),
            ),
            AgentAction::ScenarioPlanning {
                topic,
                time_horizon,
            } => format!(
                r#"Develop scenario plans for: {topic}
Time horizon: {time_horizon}

Provide:
1. BASE_CASE: [Most likely scenario]
2. BEST_CASE: [Optimistic but plausible]
3. WORST_CASE: [Pessimistic but plausible]
4. WILD_CARD: [Low probability, high impact]
5. INDICATORS: [Signals to watch for each scenario]
6. CONTINGENCY_PLANS: [How to prepare for each]
"#
            ),
            AgentAction::DefineVision { market, context } => format!(
                r#"Define product vision and strategy:

Market: {market}
Context: {context}

Provide:
1. VISION_STATEMENT: [Inspiring, clear vision]
2. TARGET_USERS: [Who we serve]
3. KEY_PROBLEMS: [Problems we solve]
4. UNIQUE_VALUE: [Why choose us]
5. SUCCESS_METRICS: [How we measure success]
6. STRATEGIC_PILLARS: [3-5 core strategic areas]
"#,
                context = or_none(context),
            ),
            AgentAction::WritePrd { feature, context } => format!(
                r#"Write a PRD for: {feature}

Context: {context}

Include:
1. OVERVIEW: [What and why]
2. OBJECTIVES: [What success looks like]
3. USER_STORIES: [As a [user], I want [goal], so that [benefit]]
4. ACCEPTANCE_CRITERIA: [Specific, testable criteria]
5. FUNCTIONAL_REQUIREMENTS: [What the feature does]
6. NON_FUNCTIONAL_REQUIREMENTS: [Performance, security, etc.]
7. OPEN_QUESTIONS: [What needs clarification]
8. SUCCESS_METRICS: [How to measure impact]
"#,
                context = or_none(context),
            ),
            AgentAction::DesignArchitecture {
                requirements,
                constraints,
            } => format!(
                r#"Design technical architecture for:

Requirements: {requirements}
Constraints: {constraints}

Provide:
1. HIGH_LEVEL_DESIGN: [System components and interactions]
2. TECH_STACK: [Recommended technologies with rationale]
3. DATA_MODEL: [Key entities and relationships]
4. API_DESIGN: [Key interfaces]
5. SECURITY_CONSIDERATIONS: [Authentication, authorization, data protection]
6. SCALABILITY_APPROACH: [How to handle growth]
7. TRADE_OFFS: [Key decisions and alternatives considered]
"#,
                constraints = or_none(constraints),
            ),
            AgentAction::EstimateEffort {
                scope,
                team_capacity,
            } => format!(
                r#"Estimate effort for:

Scope: {scope}
Team capacity: {team_capacity}

Provide:
1. BREAKDOWN: [Tasks/subtasks with individual estimates]
2. TOTAL_EFFORT: [In person-days or story points]
3. TIMELINE: [Calendar time with parallelization]
4. UNCERTAINTY: [Confidence level and risk factors]
5. ASSUMPTIONS: [What the estimate assumes]
6. BUFFER: [Recommended contingency]
"#,
                team_capacity = or_none(team_capacity),
            ),
        }
    }
}

fn or_none(value: &str) -> &str {
    if value.trim().is_empty() {
        "(none)"
    } else {
        value
    }
}
