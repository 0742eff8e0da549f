//! Hand-written test doubles for the application ports.

use crate::ports::provider_store::{ProviderConfigStore, ProviderStoreError};
use crate::ports::provider_transport::{
    ChunkStream, ProviderTransport, TransportError, TransportFactory,
};
use async_trait::async_trait;
use boardroom_domain::{
    CompletionRequest, InvocationResult, ProviderDescriptor, ProviderKind, ProvidersConfig,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// In-memory provider store that can be told to fail
#[derive(Default)]
pub(crate) struct MemoryStore {
    pub stored: Mutex<Option<ProvidersConfig>>,
    pub saves: AtomicUsize,
    pub fail_saves: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn with(config: ProvidersConfig) -> Self {
        Self {
            stored: Mutex::new(Some(config)),
            ..Default::default()
        }
    }
}

impl ProviderConfigStore for MemoryStore {
    fn load(&self) -> Result<Option<ProvidersConfig>, ProviderStoreError> {
        Ok(self.stored.lock().unwrap().clone())
    }

    fn save(&self, config: &ProvidersConfig) -> Result<(), ProviderStoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ProviderStoreError::Io {
                path: "memory".to_string(),
                message: "disk full".to_string(),
            });
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.stored.lock().unwrap() = Some(config.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// What a scripted provider does on one call
#[derive(Clone)]
pub(crate) enum Reply {
    Text(String),
    Fail(TransportError),
    /// Never responds
    Hang,
    /// Streams these chunks, optionally ending in an error
    Chunks(Vec<Result<String, TransportError>>),
}

impl Reply {
    pub(crate) fn text(s: &str) -> Self {
        Reply::Text(s.to_string())
    }

    pub(crate) fn fail(msg: &str) -> Self {
        Reply::Fail(TransportError::Connection(msg.to_string()))
    }
}

/// One recorded call to a scripted provider
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub provider_id: String,
    pub at: Instant,
    pub request: CompletionRequest,
}

/// Transport factory whose providers follow a script.
///
/// Each provider id has a queue of replies; once the queue is drained the
/// last reply repeats. Providers without a script fail every call.
#[derive(Default, Clone)]
pub(crate) struct ScriptedFactory {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    unbuildable: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFactory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(self, provider_id: &str, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(provider_id.to_string(), replies.into());
        self
    }

    /// Make transport creation itself fail for a provider.
    pub(crate) fn unbuildable(self, provider_id: &str) -> Self {
        self.unbuildable.lock().unwrap().push(provider_id.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_to(&self, provider_id: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.provider_id == provider_id)
            .count()
    }

    fn next_reply(&self, provider_id: &str, request: &CompletionRequest) -> Reply {
        self.calls.lock().unwrap().push(Call {
            provider_id: provider_id.to_string(),
            at: Instant::now(),
            request: request.clone(),
        });
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(provider_id) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Reply::fail("empty script")),
            None => Reply::fail("unscripted provider"),
        }
    }
}

impl TransportFactory for ScriptedFactory {
    fn create(
        &self,
        descriptor: &ProviderDescriptor,
    ) -> Result<Box<dyn ProviderTransport>, TransportError> {
        if self.unbuildable.lock().unwrap().contains(&descriptor.id) {
            return Err(TransportError::Configuration(format!(
                "cannot build transport for {}",
                descriptor.id
            )));
        }
        Ok(Box::new(ScriptedTransport {
            provider_id: descriptor.id.clone(),
            factory: self.clone(),
        }))
    }
}

struct ScriptedTransport {
    provider_id: String,
    factory: ScriptedFactory,
}

#[async_trait]
impl ProviderTransport for ScriptedTransport {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<InvocationResult, TransportError> {
        match self.factory.next_reply(&self.provider_id, request) {
            Reply::Text(text) => Ok(InvocationResult::from_text(text)),
            Reply::Fail(e) => Err(e),
            Reply::Hang => std::future::pending().await,
            Reply::Chunks(chunks) => {
                let mut text = String::new();
                for chunk in chunks {
                    text.push_str(&chunk?);
                }
                Ok(InvocationResult::from_text(text))
            }
        }
    }

    async fn stream(&self, request: &CompletionRequest) -> Result<ChunkStream, TransportError> {
        let chunks = match self.factory.next_reply(&self.provider_id, request) {
            Reply::Text(text) => vec![Ok(text)],
            Reply::Fail(e) => return Err(e),
            Reply::Hang => std::future::pending().await,
            Reply::Chunks(chunks) => chunks,
        };
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

/// A provider descriptor with sensible test defaults
pub(crate) fn provider(id: &str, priority: i32) -> ProviderDescriptor {
    ProviderDescriptor::new(
        id,
        format!("Provider {}", id.to_uppercase()),
        ProviderKind::OpenAiCompatible,
        "test-key",
        format!("{}-model", id),
    )
    .with_priority(priority)
}
