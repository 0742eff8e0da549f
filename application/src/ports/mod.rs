//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod artifact_store;
pub mod conversation_logger;
pub mod participant;
pub mod progress;
pub mod provider_store;
pub mod provider_transport;
