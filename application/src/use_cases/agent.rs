//! LLM-backed role agents
//!
//! An [`LlmAgent`] is a [`Participant`] whose thinking is delegated to the
//! [`ResilientInvoker`]. Every call sends the role's system prompt, the
//! agent's context (if any) as a second system message, then the prompt.

use crate::ports::participant::{Participant, ParticipantError};
use crate::use_cases::invoke::ResilientInvoker;
use async_trait::async_trait;
use boardroom_domain::{
    ActionOutcome, AgentAction, AgentThought, CompletionRequest, MeetingId, Message,
    ParticipantRole, RolePromptTemplate, short_id,
};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A role agent backed by the resilient invoker
pub struct LlmAgent {
    id: String,
    role: ParticipantRole,
    name: String,
    system_prompt: String,
    context: Vec<(String, String)>,
    provider_id: Option<String>,
    temperature: f32,
    invoker: Option<Arc<ResilientInvoker>>,
    thoughts: Mutex<Vec<AgentThought>>,
}

impl LlmAgent {
    pub fn new(role: ParticipantRole, invoker: Arc<ResilientInvoker>) -> Self {
        let temperature = invoker.config().temperature;
        let mut agent = Self::without_inference(role);
        agent.invoker = Some(invoker);
        agent.temperature = temperature;
        agent
    }

    /// An agent that can sit in a meeting but never speaks.
    pub fn without_inference(role: ParticipantRole) -> Self {
        Self {
            id: short_id(),
            name: role.default_name(),
            system_prompt: RolePromptTemplate::system(&role),
            role,
            context: Vec::new(),
            provider_id: None,
            temperature: 0.7,
            invoker: None,
            thoughts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Pin this agent to one provider instead of the priority list.
    pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set a context entry, replacing an existing key in place.
    pub fn set_context(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.context.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.context.push((key, value)),
        }
    }

    pub fn get_context(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Thoughts recorded so far, oldest first.
    pub fn thoughts(&self) -> Vec<AgentThought> {
        self.thoughts
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    fn record(&self, thought: AgentThought) {
        if let Ok(mut thoughts) = self.thoughts.lock() {
            thoughts.push(thought);
        }
    }

    fn build_request(&self, prompt: &str) -> CompletionRequest {
        let mut messages = Vec::with_capacity(3);
        if !self.system_prompt.is_empty() {
            messages.push(Message::system(&self.system_prompt));
        }
        if let Some(context) = RolePromptTemplate::context(&self.context) {
            messages.push(Message::system(context));
        }
        messages.push(Message::user(prompt));

        let max_tokens = self.invoker.as_ref().and_then(|i| i.config().max_tokens);
        CompletionRequest::new(messages)
            .with_temperature(self.temperature)
            .with_max_tokens(max_tokens)
    }

    /// Perform a role-specific action.
    ///
    /// The action must belong to this agent's role; that is checked before
    /// any inference happens.
    pub async fn act(&self, action: AgentAction) -> Result<ActionOutcome, ParticipantError> {
        if !self.supports(&action) {
            return Err(ParticipantError::ActionNotSupported {
                role: self.role.clone(),
                action: action.name(),
            });
        }

        debug!("{} performing {}", self.name, action.name());
        let output = self.think(&RolePromptTemplate::action(&action)).await?;
        self.record(AgentThought::new(&self.id, self.role.clone(), action.thought()));
        Ok(ActionOutcome::new(&action, output))
    }
}

#[async_trait]
impl Participant for LlmAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> &ParticipantRole {
        &self.role
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn has_inference(&self) -> bool {
        self.invoker.is_some()
    }

    async fn think(&self, prompt: &str) -> Result<String, ParticipantError> {
        let invoker = self
            .invoker
            .as_ref()
            .ok_or_else(|| ParticipantError::NoInference {
                name: self.name.clone(),
            })?;
        let request = self.build_request(prompt);
        let result = invoker
            .complete(&request, self.provider_id.as_deref())
            .await?;
        Ok(result.content)
    }

    fn note(&self, content: &str, meeting_id: &MeetingId) {
        self.record(
            AgentThought::new(&self.id, self.role.clone(), content).in_meeting(meeting_id.clone()),
        );
    }
}
