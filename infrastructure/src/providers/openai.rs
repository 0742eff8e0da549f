//! OpenAI chat-completions transport
//!
//! Also serves any OpenAI-compatible endpoint (local servers, gateways).

use super::{base_url, check_status, send_error, sse};
use async_trait::async_trait;
use boardroom_application::{ChunkStream, ProviderTransport, TransportError};
use boardroom_domain::{CompletionRequest, InvocationResult, TokenUsage};
use futures::StreamExt;
use futures::future::ready;
use serde_json::{Value, json};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const DONE: &str = "[DONE]";

pub struct OpenAiTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiTransport {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url(endpoint),
            api_key: api_key.to_string(),
        }
    }

    fn payload(request: &CompletionRequest, stream: bool) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let mut payload = json!({
            "model": request.model,
            "messages": messages,
            "temperature": request.temperature,
        });
        if let Some(max_tokens) = request.max_tokens {
            payload["max_tokens"] = json!(max_tokens);
        }
        if stream {
            payload["stream"] = json!(true);
        }
        payload
    }

    async fn post(&self, payload: &Value) -> Result<reqwest::Response, TransportError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(send_error)?;
        check_status(response).await
    }
}

/// Extract the message text and usage from a chat-completions response.
fn parse_completion(data: &Value) -> Result<InvocationResult, TransportError> {
    let content = data
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| TransportError::InvalidResponse("No message content in response".into()))?;

    let usage = data
        .get("usage")
        .map(|u| {
            let count = |key: &str| u.get(key).and_then(Value::as_u64).unwrap_or(0) as u32;
            TokenUsage::new(count("prompt_tokens"), count("completion_tokens"))
        })
        .unwrap_or_default();

    Ok(InvocationResult::new(content, usage))
}

/// Text carried by one streamed chunk, if any.
fn parse_delta(data: &str) -> Result<Option<String>, TransportError> {
    let value: Value = serde_json::from_str(data)
        .map_err(|e| TransportError::InvalidResponse(format!("bad stream chunk: {}", e)))?;
    Ok(value
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

#[async_trait]
impl ProviderTransport for OpenAiTransport {
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
            .take_while(|event| ready(!matches!(event, Ok(e) if e.data == DONE)))
            .filter_map(|event| {
                ready(match event {
                    Ok(event) => parse_delta(&event.data).transpose(),
                    Err(e) => Some(Err(e)),
                })
            })
            .boxed();
        Ok(chunks)
    }
}
