//! Core domain concepts shared across all subdomains.
//!
//! - [`id::MeetingId`] - meeting identifier, plus short ids for other records
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod id;
