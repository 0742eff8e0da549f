//! HTTP provider transports
//!
//! One transport exists per [`ProviderKind`]. [`HttpTransportFactory`] builds
//! them from descriptors for the resilient invoker; every transport shares a
//! single `reqwest::Client` connection pool.

pub mod anthropic;
pub mod mock;
pub mod openai;
pub mod sse;

pub use anthropic::AnthropicTransport;
pub use mock::{MockTransport, MockTransportFactory};
pub use openai::OpenAiTransport;

use boardroom_application::{ProviderTransport, TransportError, TransportFactory};
use boardroom_domain::{ProviderDescriptor, ProviderKind};
use tracing::debug;

/// Builds HTTP transports from provider descriptors
#[derive(Clone, Default)]
pub struct HttpTransportFactory {
    client: reqwest::Client,
}

impl HttpTransportFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl TransportFactory for HttpTransportFactory {
    fn create(
        &self,
        descriptor: &ProviderDescriptor,
    ) -> Result<Box<dyn ProviderTransport>, TransportError> {
        let endpoint = descriptor.endpoint_override.as_deref();
        debug!(
            "Building {} transport for {} ({})",
            descriptor.kind,
            descriptor.id,
            endpoint.unwrap_or("default endpoint")
        );

        match descriptor.kind {
            ProviderKind::OpenAi => Ok(Box::new(OpenAiTransport::new(
                self.client.clone(),
                endpoint.unwrap_or(openai::DEFAULT_BASE_URL),
                &descriptor.credential,
            ))),
            ProviderKind::OpenAiCompatible => {
                let endpoint = endpoint.ok_or_else(|| {
                    TransportError::Configuration(format!(
                        "provider '{}' is openai-compatible but has no base_url",
                        descriptor.id
                    ))
                })?;
                Ok(Box::new(OpenAiTransport::new(
                    self.client.clone(),
                    endpoint,
                    &descriptor.credential,
                )))
            }
            ProviderKind::Anthropic => Ok(Box::new(AnthropicTransport::new(
                self.client.clone(),
                endpoint.unwrap_or(anthropic::DEFAULT_BASE_URL),
                &descriptor.credential,
            ))),
        }
    }
}

/// Map a non-success HTTP status to a transport error.
pub(crate) fn status_error(status: u16, body: String) -> TransportError {
    match status {
        401 | 403 => TransportError::Authentication(body),
        429 => TransportError::RateLimited(body),
        _ => TransportError::Http { status, body },
    }
}

/// Pass a successful response through; turn anything else into an error.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status.as_u16(), body))
}

pub(crate) fn send_error(error: reqwest::Error) -> TransportError {
    TransportError::Connection(error.to_string())
}

pub(crate) fn base_url(endpoint: &str) -> String {
    endpoint.trim_end_matches('/').to_string()
}
