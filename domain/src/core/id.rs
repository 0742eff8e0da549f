//! Identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Generate a short 8-hex identifier.
///
/// Used for agents, decisions and action items, where the id is only
/// displayed and cross-referenced inside one workspace.
pub fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Unique identifier of a meeting (Value Object)
///
/// Allocated once at meeting creation and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(String);

impl MeetingId {
    /// Allocate a fresh meeting id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MeetingId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MeetingId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
