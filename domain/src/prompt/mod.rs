//! Prompt domain
//!
//! Templates for generating prompts at each stage of a meeting and for role actions.

pub mod agent;
mod template;

pub use agent::RolePromptTemplate;
pub use template::{DISCUSSION_ROUNDS, MeetingPromptTemplate};
