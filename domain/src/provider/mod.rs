//! Inference provider configuration.
//!
//! Descriptors and dispatch settings are plain data; the registry that
//! persists them and the invoker that dispatches over them live in the
//! application layer.

pub mod entities;

pub use entities::{DispatchSettings, ProviderDescriptor, ProviderKind, ProvidersConfig};
