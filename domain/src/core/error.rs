//! Domain error types

use thiserror::Error;

/// Violations of domain invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid provider: {0}")]
    InvalidProvider(String),

    #[error("Duplicate provider id: {0}")]
    DuplicateProvider(String),

    #[error("Invalid dispatch settings: {0}")]
    InvalidSettings(String),

    #[error("Unknown meeting type: {0}")]
    UnknownMeetingType(String),
}
