//! Conversation messages, completion requests and streaming events.

pub mod entities;
pub mod stream;
