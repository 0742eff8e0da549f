//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod agent;
pub mod invoke;
pub mod registry;
pub mod run_meeting;
pub mod workspace;
