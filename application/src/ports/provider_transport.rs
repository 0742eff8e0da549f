//! Provider transport port
//!
//! Defines the interface for talking to a single inference provider.
//! One transport is created per attempt from the provider's descriptor.

use async_trait::async_trait;
use boardroom_domain::{CompletionRequest, InvocationResult, ProviderDescriptor, StreamEvent};
use futures::stream::BoxStream;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur while calling a provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Other(String),
}

/// Stream of text chunks from a provider
pub type ChunkStream = BoxStream<'static, Result<String, TransportError>>;

/// A connection to one provider
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ProviderTransport: Send + Sync {
    /// Send a request and wait for the complete response
    async fn complete(&self, request: &CompletionRequest)
    -> Result<InvocationResult, TransportError>;

    /// Send a request and receive the response as text chunks
    async fn stream(&self, request: &CompletionRequest) -> Result<ChunkStream, TransportError>;
}

/// Builds transports from provider descriptors
pub trait TransportFactory: Send + Sync {
    fn create(
        &self,
        descriptor: &ProviderDescriptor,
    ) -> Result<Box<dyn ProviderTransport>, TransportError>;
}

/// Handle for receiving streaming events from the invoker.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Receive the next event, or `None` once the producer is gone.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.receiver.recv().await
    }

    /// Consume the stream and return the text of the successful attempt.
    ///
    /// Deltas from abandoned attempts are discarded at each `Restarted` marker.
    /// A stream that closes before `Completed` or `Error` is an error.
    pub async fn collect_text(mut self) -> Result<String, String> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Restarted { .. } => full_text.clear(),
                StreamEvent::Completed(text) => return Ok(text),
                StreamEvent::Error(e) => return Err(e),
            }
        }
        // The producer died mid-answer; whatever arrived is truncated.
        Err("stream ended without completion".to_string())
    }
}
