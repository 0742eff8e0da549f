//! Anthropic messages API transport

use super::{base_url, check_status, send_error, sse};
use async_trait::async_trait;
use boardroom_application::{ChunkStream, ProviderTransport, TransportError};
use boardroom_domain::{CompletionRequest, InvocationResult, TokenUsage};
use futures::StreamExt;
use futures::future::ready;
use serde_json::{Value, json};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

pub struct AnthropicTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AnthropicTransport {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url(endpoint),
            api_key: api_key.to_string(),
        }
    }

    /// System messages travel in the top-level `system` field.
    fn payload(request: &CompletionRequest, stream: bool) -> Value {
        let messages: Vec<Value> = request
            .turns()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let mut payload = json!({
            "model": request.model,
            "messages": messages,
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "temperature": request.temperature,
        });
        if let Some(system) = request.system_text() {
            payload["system"] = json!(system);
        }
        if stream {
            payload["stream"] = json!(true);
        }
        payload
    }

    async fn post(&self, payload: &Value) -> Result<reqwest::Response, TransportError> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(payload)
            .send()
            .await
            .map_err(send_error)?;
        check_status(response).await
    }
}

fn parse_completion(data: &Value) -> Result<InvocationResult, TransportError> {
    let blocks = data
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| TransportError::InvalidResponse("No content array in response".into()))?;

    let content: String = blocks
        .iter()
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect();

    let usage = data
        .get("usage")
        .map(|u| {
            let count = |key: &str| u.get(key).and_then(Value::as_u64).unwrap_or(0) as u32;
            TokenUsage::new(count("input_tokens"), count("output_tokens"))
        })
        .unwrap_or_default();

    Ok(InvocationResult::new(content, usage))
}

/// What one streamed event means for the caller
#[derive(Debug, PartialEq, Eq)]
enum StreamStep {
    Text(String),
    Skip,
    Stop,
}

fn parse_event(data: &str) -> Result<StreamStep, TransportError> {
    let value: Value = serde_json::from_str(data)
        .map_err(|e| TransportError::InvalidResponse(format!("bad stream event: {}", e)))?;

    match value.get("type").and_then(Value::as_str) {
        Some("content_block_delta") => Ok(value
            .pointer("/delta/text")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|s| StreamStep::Text(s.to_string()))
            .unwrap_or(StreamStep::Skip)),
        Some("message_stop") => Ok(StreamStep::Stop),
        Some("error") => {
            let message = value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("stream error");
            Err(TransportError::InvalidResponse(message.to_string()))
        }
        _ => Ok(StreamStep::Skip),
    }
}

#[async_trait]
impl ProviderTransport for AnthropicTransport {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<InvocationResult, TransportError> {
        let response = self.post(&Self::payload(request, false)).await?;
        let data: Value = response
            .json()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
        parse_completion(&data)
    }

    async fn stream(&self, request: &CompletionRequest) -> Result<ChunkStream, TransportError> {
        let response = self.post(&Self::payload(request, true)).await?;
        let chunks = sse::events(response.bytes_stream())
            .map(|event| event.and_then(|e| parse_event(&e.data)))
            .take_while(|step| ready(!matches!(step, Ok(StreamStep::Stop))))
            .filter_map(|step| {
                ready(match step {
                    Ok(StreamStep::Text(text)) => Some(Ok(text)),
                    Ok(_) => None,
                    Err(e) => Some(Err(e)),
                })
            })
            .boxed();
        Ok(chunks)
    }
}
