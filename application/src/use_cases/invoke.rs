//! Resilient multi-provider invoker
//!
//! Dispatches completion requests over the configured providers in priority
//! order. Each provider gets `max_retries` attempts with exponential backoff
//! (`retry_delay * 2^(attempt-1)`); once a provider is exhausted the invoker
//! fails over to the next one when `auto_switch` is on.

use crate::config::InvokerConfig;
use crate::ports::provider_transport::{StreamHandle, TransportError, TransportFactory};
use crate::use_cases::registry::ProviderRegistry;
use boardroom_domain::{
    CompletionRequest, InvocationResult, Message, ProviderDescriptor, StreamEvent,
};
use futures::StreamExt;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Capacity of the stream event channel
const STREAM_BUFFER: usize = 64;

/// Longest provider error kept in a check message
const CHECK_ERROR_LEN: usize = 100;

const CANARY_SYSTEM: &str = "You are a helpful assistant.";
const CANARY_USER: &str = "Say 'Test successful' and nothing else.";
const CANARY_EXPECTED: &str = "Test successful";

/// Errors from an invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    #[error("No providers available")]
    NoProvidersAvailable,

    #[error("Provider {0} not found")]
    ProviderNotFound(String),

    #[error("Provider {0} is disabled")]
    ProviderDisabled(String),

    #[error("All providers failed: {}", format_errors(.errors))]
    AllProvidersFailed { errors: BTreeMap<String, String> },

    #[error("Operation cancelled")]
    Cancelled,
}

fn format_errors(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(name, message)| format!("{}: {}", name, message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Outcome of a provider health check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCheck {
    pub success: bool,
    pub message: String,
}

/// Why a single attempt did not produce a result
enum AttemptError {
    Failed(TransportError),
    Cancelled,
}

/// Dispatches requests across providers with retry, backoff and failover
pub struct ResilientInvoker {
    registry: Arc<ProviderRegistry>,
    factory: Arc<dyn TransportFactory>,
    config: InvokerConfig,
    cancellation: Option<CancellationToken>,
}

impl ResilientInvoker {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        factory: Arc<dyn TransportFactory>,
        config: InvokerConfig,
    ) -> Self {
        Self {
            registry,
            factory,
            config,
            cancellation: None,
        }
    }

    /// Abort in-flight attempts and backoff waits when this token fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Providers to try, in order.
    ///
    /// A named provider is used alone even when disabled; an unknown name
    /// yields no candidates.
    fn candidates(&self, provider_id: Option<&str>) -> Vec<ProviderDescriptor> {
        match provider_id {
            Some(id) => self.registry.get_provider(id).into_iter().collect(),
            None => self.registry.enabled_providers(),
        }
    }

    fn prepare(&self, request: &CompletionRequest, provider: &ProviderDescriptor) -> CompletionRequest {
        let mut prepared = request.for_model(&provider.default_model);
        if prepared.max_tokens.is_none() {
            prepared.max_tokens = self.config.max_tokens;
        }
        prepared
    }

    async fn cancellable<F: Future>(&self, future: F) -> Result<F::Output, InvokeError> {
        match &self.cancellation {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(InvokeError::Cancelled),
                output = future => Ok(output),
            },
            None => Ok(future.await),
        }
    }

    fn check_cancelled(&self) -> Result<(), InvokeError> {
        if let Some(token) = &self.cancellation
            && token.is_cancelled()
        {
            return Err(InvokeError::Cancelled);
        }
        Ok(())
    }

    /// One call to one provider, bounded by the attempt timeout.
    async fn attempt(
        &self,
        provider: &ProviderDescriptor,
        request: &CompletionRequest,
    ) -> Result<InvocationResult, AttemptError> {
        let transport = self
            .factory
            .create(provider)
            .map_err(AttemptError::Failed)?;
        let request = self.prepare(request, provider);
        let timeout = self.config.attempt_timeout;

        let outcome = self
            .cancellable(tokio::time::timeout(timeout, transport.complete(&request)))
            .await
            .map_err(|_| AttemptError::Cancelled)?;

        match outcome {
            Ok(result) => result.map_err(AttemptError::Failed),
            Err(_) => Err(AttemptError::Failed(TransportError::Timeout(
                timeout.as_secs(),
            ))),
        }
    }

    /// Send a request, retrying and failing over as configured.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
        provider_id: Option<&str>,
    ) -> Result<InvocationResult, InvokeError> {
        let candidates = self.candidates(provider_id);
        if candidates.is_empty() {
            return Err(InvokeError::NoProvidersAvailable);
        }

        let settings = self.registry.settings();
        let mut errors = BTreeMap::new();

        for (index, provider) in candidates.iter().enumerate() {
            for attempt in 1..=settings.max_retries {
                self.check_cancelled()?;
                debug!(
                    "Calling {} (attempt {}/{})",
                    provider.name, attempt, settings.max_retries
                );

                match self.attempt(provider, request).await {
                    Ok(result) => {
                        debug!("{} responded", provider.name);
                        return Ok(result);
                    }
                    Err(AttemptError::Cancelled) => return Err(InvokeError::Cancelled),
                    Err(AttemptError::Failed(e)) => {
                        warn!(
                            "{} failed (attempt {}/{}): {}",
                            provider.name, attempt, settings.max_retries, e
                        );
                        errors.insert(provider.name.clone(), e.to_string());
                        if attempt < settings.max_retries {
                            let delay = settings.backoff_for_attempt(attempt);
                            debug!("Backing off {:?} before retrying {}", delay, provider.name);
                            self.cancellable(tokio::time::sleep(delay)).await?;
                        }
                    }
                }
            }

            if !settings.auto_switch {
                break;
            }
            if let Some(next) = candidates.get(index + 1) {
                info!("Failing over from {} to {}", provider.name, next.name);
            }
        }

        Err(InvokeError::AllProvidersFailed { errors })
    }

    /// Stream a response, failing over between providers without retries.
    ///
    /// Candidate resolution errors are returned directly; everything after
    /// that arrives as [`StreamEvent`]s on the handle.
    pub fn stream(
        &self,
        request: &CompletionRequest,
        provider_id: Option<&str>,
    ) -> Result<StreamHandle, InvokeError> {
        let candidates = self.candidates(provider_id);
        if candidates.is_empty() {
            return Err(InvokeError::NoProvidersAvailable);
        }
        self.check_cancelled()?;

        let prepared: Vec<(ProviderDescriptor, CompletionRequest)> = candidates
            .into_iter()
            .map(|p| {
                let request = self.prepare(request, &p);
                (p, request)
            })
            .collect();

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let run = StreamRun {
            factory: Arc::clone(&self.factory),
            auto_switch: self.registry.settings().auto_switch,
            idle_timeout: self.config.attempt_timeout,
            cancellation: self.cancellation.clone().unwrap_or_default(),
            tx,
        };
        tokio::spawn(run.drive(prepared));

        Ok(StreamHandle::new(rx))
    }

    /// Send the canary prompt to one provider, once.
    pub async fn test_provider(&self, provider_id: &str) -> Result<ProviderCheck, InvokeError> {
        let provider = self
            .registry
            .get_provider(provider_id)
            .ok_or_else(|| InvokeError::ProviderNotFound(provider_id.to_string()))?;
        if !provider.enabled {
            return Err(InvokeError::ProviderDisabled(provider_id.to_string()));
        }

        let request = CompletionRequest::new(vec![
            Message::system(CANARY_SYSTEM),
            Message::user(CANARY_USER),
        ]);

        match self.attempt(&provider, &request).await {
            Ok(result) if result.content.contains(CANARY_EXPECTED) => Ok(ProviderCheck {
                success: true,
                message: format!("Provider {} is working", provider.name),
            }),
            Ok(_) => Ok(ProviderCheck {
                success: true,
                message: format!("Provider {} responded (unexpected content)", provider.name),
            }),
            Err(AttemptError::Failed(e)) => {
                let error: String = e.to_string().chars().take(CHECK_ERROR_LEN).collect();
                Ok(ProviderCheck {
                    success: false,
                    message: format!("Provider {} failed: {}", provider.name, error),
                })
            }
            Err(AttemptError::Cancelled) => Err(InvokeError::Cancelled),
        }
    }

    /// Check every registered provider in insertion order.
    pub async fn test_all_providers(&self) -> Vec<(String, Result<ProviderCheck, InvokeError>)> {
        let mut results = Vec::new();
        for provider in self.registry.list_providers() {
            let check = self.test_provider(&provider.id).await;
            results.push((provider.id, check));
        }
        results
    }
}

/// State owned by a spawned streaming task
struct StreamRun {
    factory: Arc<dyn TransportFactory>,
    auto_switch: bool,
    idle_timeout: Duration,
    cancellation: CancellationToken,
    tx: mpsc::Sender<StreamEvent>,
}

/// How one streaming attempt ended
enum StreamOutcome {
    Completed(String),
    Failed(TransportError),
    Cancelled,
    /// The receiver went away
    Abandoned,
}

impl StreamRun {
    async fn drive(self, candidates: Vec<(ProviderDescriptor, CompletionRequest)>) {
        let mut errors = BTreeMap::new();
        let mut last_error: Option<String> = None;

        for (provider, request) in &candidates {
            if let Some(reason) = last_error.take() {
                info!("Restarting stream on {}", provider.name);
                let restarted = StreamEvent::Restarted {
                    provider: provider.name.clone(),
                    reason,
                };
                if self.tx.send(restarted).await.is_err() {
                    return;
                }
            }

            match self.attempt(provider, request).await {
                StreamOutcome::Completed(text) => {
                    let _ = self.tx.send(StreamEvent::Completed(text)).await;
                    return;
                }
                StreamOutcome::Failed(e) => {
                    warn!("Stream from {} failed: {}", provider.name, e);
                    errors.insert(provider.name.clone(), e.to_string());
                    last_error = Some(e.to_string());
                }
                StreamOutcome::Cancelled => {
                    let _ = self
                        .tx
                        .send(StreamEvent::Error(InvokeError::Cancelled.to_string()))
                        .await;
                    return;
                }
                StreamOutcome::Abandoned => return,
            }

            if !self.auto_switch {
                break;
            }
        }

        let error = InvokeError::AllProvidersFailed { errors };
        let _ = self.tx.send(StreamEvent::Error(error.to_string())).await;
    }

    async fn attempt(
        &self,
        provider: &ProviderDescriptor,
        request: &CompletionRequest,
    ) -> StreamOutcome {
        let transport = match self.factory.create(provider) {
            Ok(transport) => transport,
            Err(e) => return StreamOutcome::Failed(e),
        };

        let opened = tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => return StreamOutcome::Cancelled,
            opened = tokio::time::timeout(self.idle_timeout, transport.stream(request)) => opened,
        };
        let mut chunks = match opened {
            Ok(Ok(chunks)) => chunks,
            Ok(Err(e)) => return StreamOutcome::Failed(e),
            Err(_) => return StreamOutcome::Failed(TransportError::Timeout(self.idle_timeout.as_secs())),
        };

        let mut text = String::new();
        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => return StreamOutcome::Cancelled,
                next = tokio::time::timeout(self.idle_timeout, chunks.next()) => next,
            };
            match next {
                Ok(Some(Ok(chunk))) => {
                    text.push_str(&chunk);
                    if self.tx.send(StreamEvent::Delta(chunk)).await.is_err() {
                        return StreamOutcome::Abandoned;
                    }
                }
                Ok(Some(Err(e))) => return StreamOutcome::Failed(e),
                Ok(None) => return StreamOutcome::Completed(text),
                Err(_) => {
                    return StreamOutcome::Failed(TransportError::Timeout(
                        self.idle_timeout.as_secs(),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, Reply, ScriptedFactory, provider};
    use boardroom_domain::{DispatchSettings, ProvidersConfig};
    use tokio::time::Instant;

    fn registry(providers: Vec<ProviderDescriptor>, settings: DispatchSettings) -> Arc<ProviderRegistry> {
        let config = ProvidersConfig {
            providers,
            settings,
        };
        Arc::new(ProviderRegistry::load(Arc::new(MemoryStore::with(config))).unwrap())
    }

    fn invoker(registry: Arc<ProviderRegistry>, factory: &ScriptedFactory) -> ResilientInvoker {
        ResilientInvoker::new(
            registry,
            Arc::new(factory.clone()),
            InvokerConfig::default().with_timeout_seconds(5),
        )
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(vec![Message::user("hello")])
    }

    fn fast() -> DispatchSettings {
        DispatchSettings {
            retry_delay_seconds: 0.0,
            ..DispatchSettings::default()
        }
    }

    #[tokio::test]
    async fn no_providers_available() {
        let factory = ScriptedFactory::new();
        let invoker = invoker(registry(vec![], fast()), &factory);
        assert_eq!(
            invoker.complete(&request(), None).await.unwrap_err(),
            InvokeError::NoProvidersAvailable
        );
        assert!(matches!(
            invoker.stream(&request(), None),
            Err(InvokeError::NoProvidersAvailable)
        ));
    }

    #[tokio::test]
    async fn unknown_specific_provider_yields_no_candidates() {
        let factory = ScriptedFactory::new().script("a", vec![Reply::text("ok")]);
        let invoker = invoker(registry(vec![provider("a", 1)], fast()), &factory);
        assert_eq!(
            invoker.complete(&request(), Some("ghost")).await.unwrap_err(),
            InvokeError::NoProvidersAvailable
        );
    }

    #[tokio::test]
    async fn fills_model_from_provider_default() {
        let factory = ScriptedFactory::new().script("a", vec![Reply::text("ok")]);
        let invoker = invoker(registry(vec![provider("a", 1)], fast()), &factory);
        invoker.complete(&request(), None).await.unwrap();
        assert_eq!(factory.calls()[0].request.model, "a-model");
    }

    #[tokio::test]
    async fn disabled_providers_are_skipped_unless_named() {
        let factory = ScriptedFactory::new()
            .script("a", vec![Reply::text("from a")])
            .script("b", vec![Reply::text("from b")]);
        let invoker = invoker(
            registry(vec![provider("a", 1).disabled(), provider("b", 2)], fast()),
            &factory,
        );

        let result = invoker.complete(&request(), None).await.unwrap();
        assert_eq!(result.content, "from b");
        assert_eq!(factory.calls_to("a"), 0);

        let result = invoker.complete(&request(), Some("a")).await.unwrap();
        assert_eq!(result.content, "from a");
    }

    #[tokio::test(start_paused = true)]
    async fn retries_with_exponential_backoff() {
        let factory = ScriptedFactory::new().script("a", vec![Reply::fail("boom")]);
        let settings = DispatchSettings {
            max_retries: 3,
            retry_delay_seconds: 1.0,
            auto_switch: true,
            fallback_to_mock: false,
        };
        let invoker = invoker(registry(vec![provider("a", 1)], settings), &factory);

        let start = Instant::now();
        let err = invoker.complete(&request(), None).await.unwrap_err();
        let elapsed = start.elapsed();

        let offsets: Vec<Duration> = factory.calls().iter().map(|c| c.at - start).collect();
        assert_eq!(
            offsets,
            vec![
                Duration::ZERO,
                Duration::from_secs(1),
                Duration::from_secs(3)
            ]
        );
        // No wait after the final attempt
        assert_eq!(elapsed, Duration::from_secs(3));

        match err {
            InvokeError::AllProvidersFailed { errors } => {
                assert_eq!(errors.len(), 1);
                assert!(errors["Provider A"].contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failover_stops_at_first_success() {
        let factory = ScriptedFactory::new()
            .script("a", vec![Reply::fail("down")])
            .script("b", vec![Reply::text("from b")])
            .script("c", vec![Reply::text("from c")]);
        let invoker = invoker(
            registry(
                vec![provider("c", 3), provider("a", 1), provider("b", 2)],
                fast(),
            ),
            &factory,
        );

        let result = invoker.complete(&request(), None).await.unwrap();
        assert_eq!(result.content, "from b");
        assert_eq!(factory.calls_to("a"), 3);
        assert_eq!(factory.calls_to("b"), 1);
        assert_eq!(factory.calls_to("c"), 0);
    }

    #[tokio::test]
    async fn auto_switch_off_reports_only_first_provider() {
        let factory = ScriptedFactory::new()
            .script("a", vec![Reply::fail("down")])
            .script("b", vec![Reply::text("from b")]);
        let settings = DispatchSettings {
            auto_switch: false,
            ..fast()
        };
        let invoker = invoker(
            registry(vec![provider("a", 1), provider("b", 2)], settings),
            &factory,
        );

        match invoker.complete(&request(), None).await.unwrap_err() {
            InvokeError::AllProvidersFailed { errors } => {
                assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["Provider A"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(factory.calls_to("b"), 0);
    }

    #[tokio::test]
    async fn transport_creation_failure_counts_as_attempt() {
        let factory = ScriptedFactory::new()
            .unbuildable("a")
            .script("b", vec![Reply::text("from b")]);
        let invoker = invoker(
            registry(vec![provider("a", 1), provider("b", 2)], fast()),
            &factory,
        );
        assert_eq!(
            invoker.complete(&request(), None).await.unwrap().content,
            "from b"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_attempt_is_retried() {
        let factory = ScriptedFactory::new().script("a", vec![Reply::Hang, Reply::text("late")]);
        let settings = DispatchSettings {
            retry_delay_seconds: 1.0,
            ..DispatchSettings::default()
        };
        let invoker = invoker(registry(vec![provider("a", 1)], settings), &factory);

        let start = Instant::now();
        let result = invoker.complete(&request(), None).await.unwrap();
        assert_eq!(result.content, "late");
        assert_eq!(factory.calls_to("a"), 2);
        // 5s attempt timeout plus 1s backoff
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_backoff() {
        let factory = ScriptedFactory::new().script("a", vec![Reply::fail("down")]);
        let settings = DispatchSettings {
            retry_delay_seconds: 60.0,
            ..DispatchSettings::default()
        };
        let token = CancellationToken::new();
        let invoker = invoker(registry(vec![provider("a", 1)], settings), &factory)
            .with_cancellation(token.clone());

        let cancel = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });

        assert_eq!(
            invoker.complete(&request(), None).await.unwrap_err(),
            InvokeError::Cancelled
        );
        assert_eq!(factory.calls_to("a"), 1);
        cancel.await.unwrap();
    }

    #[tokio::test]
    async fn stream_fails_over_with_restart_marker() {
        let factory = ScriptedFactory::new()
            .script(
                "a",
                vec![Reply::Chunks(vec![
                    Ok("par".to_string()),
                    Err(TransportError::Connection("reset".to_string())),
                ])],
            )
            .script(
                "b",
                vec![Reply::Chunks(vec![Ok("Hel".to_string()), Ok("lo".to_string())])],
            );
        let invoker = invoker(
            registry(vec![provider("a", 1), provider("b", 2)], fast()),
            &factory,
        );

        let mut handle = invoker.stream(&request(), None).unwrap();
        let mut events = Vec::new();
        while let Some(event) = handle.next_event().await {
            events.push(event);
        }

        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("par".to_string()),
                StreamEvent::Restarted {
                    provider: "Provider B".to_string(),
                    reason: "Connection error: reset".to_string(),
                },
                StreamEvent::Delta("Hel".to_string()),
                StreamEvent::Delta("lo".to_string()),
                StreamEvent::Completed("Hello".to_string()),
            ]
        );
        // No retries on the streaming path
        assert_eq!(factory.calls_to("a"), 1);
    }

    #[tokio::test]
    async fn stream_exhaustion_ends_in_error() {
        let factory = ScriptedFactory::new().script("a", vec![Reply::fail("down")]);
        let invoker = invoker(registry(vec![provider("a", 1)], fast()), &factory);

        let handle = invoker.stream(&request(), None).unwrap();
        let err = handle.collect_text().await.unwrap_err();
        assert!(err.starts_with("All providers failed"));
        assert!(err.contains("Provider A"));
    }

    #[tokio::test]
    async fn test_provider_reports_content_match() {
        let factory = ScriptedFactory::new()
            .script("a", vec![Reply::text("Test successful")])
            .script("b", vec![Reply::text("Hi there")]);
        let invoker = invoker(
            registry(vec![provider("a", 1), provider("b", 2)], fast()),
            &factory,
        );

        let check = invoker.test_provider("a").await.unwrap();
        assert!(check.success);
        assert_eq!(check.message, "Provider Provider A is working");

        let check = invoker.test_provider("b").await.unwrap();
        assert!(check.success);
        assert!(check.message.ends_with("responded (unexpected content)"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_truncated() {
        let long = "x".repeat(300);
        let factory = ScriptedFactory::new().script("a", vec![Reply::Fail(TransportError::Other(long))]);
        let invoker = invoker(registry(vec![provider("a", 1)], fast()), &factory);

        let check = invoker.test_provider("a").await.unwrap();
        assert!(!check.success);
        let detail = check.message.trim_start_matches("Provider Provider A failed: ");
        assert_eq!(detail.len(), CHECK_ERROR_LEN);
        assert_eq!(factory.calls_to("a"), 1);
    }

    #[tokio::test]
    async fn test_provider_rejects_unknown_and_disabled() {
        let factory = ScriptedFactory::new();
        let invoker = invoker(registry(vec![provider("a", 1).disabled()], fast()), &factory);
        assert_eq!(
            invoker.test_provider("ghost").await.unwrap_err(),
            InvokeError::ProviderNotFound("ghost".to_string())
        );
        assert_eq!(
            invoker.test_provider("a").await.unwrap_err(),
            InvokeError::ProviderDisabled("a".to_string())
        );
        assert_eq!(invoker.test_all_providers().await.len(), 1);
    }

    #[test]
    fn all_failed_message_lists_providers() {
        let mut errors = BTreeMap::new();
        errors.insert("B".to_string(), "timeout".to_string());
        errors.insert("A".to_string(), "refused".to_string());
        assert_eq!(
            InvokeError::AllProvidersFailed { errors }.to_string(),
            "All providers failed: A: refused; B: timeout"
        );
    }
}
