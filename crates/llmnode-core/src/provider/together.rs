//! Together AI chat client — speaks the OpenAI-compatible chat completions API.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use crate::error::{self, NodeError};
use crate::message::{Message, Role, Usage};
use crate::provider::{BoxStream, ChatModel, FinishReason, GenerateOptions, GenerateResult};
use crate::streaming::StreamEvent;

pub const TOGETHER_BASE_URL: &str = "https://api.together.xyz/v1";

const PROVIDER: &str = "together";

/// Parameters accepted by [`TogetherLlm::new`].
///
/// Optional fields left as `None` are never sent, so the remote defaults
/// apply.
pub struct TogetherLlmConfig {
    pub temperature: f64,
    pub model: String,
    pub api_key: SecretString,
    /// Sent as-is; the provider decides whether the value is acceptable.
    pub max_tokens: Option<i64>,
    pub top_p: Option<f64>,
    /// Request timeout in milliseconds. Non-positive values fall back to the
    /// default timeout.
    pub timeout: Option<i64>,
}

impl TogetherLlmConfig {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            temperature: 0.9,
            model: model.into(),
            api_key: SecretString::from(api_key.into()),
            max_tokens: None,
            top_p: None,
            timeout: None,
        }
    }
}

impl std::fmt::Debug for TogetherLlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TogetherLlmConfig")
            .field("temperature", &self.temperature)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .field("max_tokens", &self.max_tokens)
            .field("top_p", &self.top_p)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Together AI chat model client.
pub struct TogetherLlm {
    config: TogetherLlmConfig,
    base_url: String,
    timeout_ms: u64,
    client: Client,
}

impl TogetherLlm {
    /// Capability tags this client satisfies, most specific first.
    pub const BASE_CLASSES: &'static [&'static str] =
        &["TogetherLLM", "OpenAI", "ToolCallLLM", "BaseLLM"];

    pub fn new(config: TogetherLlmConfig) -> error::Result<Self> {
        let timeout_ms = effective_timeout_ms(config.timeout);
        let client = crate::provider::build_client(Some(timeout_ms))?;
        Ok(Self {
            config,
            base_url: TOGETHER_BASE_URL.to_string(),
            timeout_ms,
            client,
        })
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> error::Result<Self> {
        let parsed = url::Url::parse(base_url.as_ref()).map_err(|e| {
            NodeError::config(format!("Invalid base URL '{}': {e}", base_url.as_ref()))
        })?;
        self.base_url = parsed.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn config(&self) -> &TogetherLlmConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Timeout actually applied to requests.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// JSON body for a chat completions request. Per-call options win over
    /// the client configuration.
    pub fn request_body(
        &self,
        messages: &[Message],
        options: &GenerateOptions,
        stream: bool,
    ) -> serde_json::Value {
        let messages: Vec<_> = messages
            .iter()
            .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
            .collect();

        let mut body = json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": options.temperature.unwrap_or(self.config.temperature),
        });

        if stream {
            body["stream"] = json!(true);
        }
        if let Some(tp) = options.top_p.or(self.config.top_p) {
            body["top_p"] = json!(tp);
        }
        if let Some(mt) = options.max_tokens.map(i64::from).or(self.config.max_tokens) {
            body["max_tokens"] = json!(mt);
        }
        if let Some(ref stops) = options.stop_sequences {
            body["stop"] = json!(stops);
        }

        body
    }

    async fn send(&self, body: &serde_json::Value) -> error::Result<reqwest::Response> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(model = %self.config.model, %url, "Sending chat completion request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        match status.as_u16() {
            401 => Err(NodeError::Authentication {
                provider: PROVIDER.to_string(),
            }),
            429 => {
                let retry_after_ms = resp
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .map(|secs| secs * 1000);
                Err(NodeError::RateLimited {
                    provider: PROVIDER.to_string(),
                    retry_after_ms,
                })
            }
            code => {
                let body: serde_json::Value = resp.json().await.unwrap_or(json!({}));
                let message = body["error"]["message"]
                    .as_str()
                    .unwrap_or("Unknown error")
                    .to_string();
                Err(NodeError::Provider {
                    message,
                    status: Some(code),
                    provider: PROVIDER.to_string(),
                    source: None,
                })
            }
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> NodeError {
        if e.is_timeout() {
            return NodeError::Timeout {
                timeout_ms: self.timeout_ms,
            };
        }
        NodeError::Provider {
            message: e.to_string(),
            status: e.status().map(|s| s.as_u16()),
            provider: PROVIDER.to_string(),
            source: Some(Box::new(e)),
        }
    }

    fn parse_response(body: &serde_json::Value) -> error::Result<GenerateResult> {
        let choice = body["choices"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| NodeError::provider(PROVIDER, "No choices in response"))?;

        let content = choice["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        let finish_reason = choice["finish_reason"]
            .as_str()
            .map(FinishReason::from_wire)
            .unwrap_or(FinishReason::Stop);

        Ok(GenerateResult {
            message: Message {
                role: Role::Assistant,
                content,
            },
            usage: parse_usage(&body["usage"]),
            finish_reason,
        })
    }
}

impl std::fmt::Debug for TogetherLlm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TogetherLlm")
            .field("config", &self.config)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn effective_timeout_ms(timeout: Option<i64>) -> u64 {
    match timeout {
        None => crate::provider::DEFAULT_TIMEOUT_MS,
        Some(ms) if ms > 0 => ms as u64,
        Some(ms) => {
            tracing::warn!(timeout = ms, "Non-positive timeout, using default");
            crate::provider::DEFAULT_TIMEOUT_MS
        }
    }
}

fn parse_usage(usage: &serde_json::Value) -> Usage {
    Usage {
        input_tokens: usage["prompt_tokens"].as_u64().unwrap_or(0),
        output_tokens: usage["completion_tokens"].as_u64().unwrap_or(0),
    }
}

/// Translate one SSE `data:` payload into stream events.
fn parse_chunk(data: &str) -> Vec<error::Result<StreamEvent>> {
    if data.trim() == "[DONE]" {
        return vec![Ok(StreamEvent::Done)];
    }

    let parsed: serde_json::Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => {
            return vec![Err(NodeError::Stream {
                message: format!("Malformed stream chunk: {e}"),
                source: Some(Box::new(e)),
            })];
        }
    };

    let mut events = Vec::new();
    if let Some(choice) = parsed["choices"].as_array().and_then(|c| c.first()) {
        if let Some(text) = choice["delta"]["content"].as_str()
            && !text.is_empty()
        {
            events.push(Ok(StreamEvent::TextDelta(text.to_string())));
        }
        if let Some(reason) = choice["finish_reason"].as_str() {
            events.push(Ok(StreamEvent::FinishReason(FinishReason::from_wire(
                reason,
            ))));
        }
    }
    if let Some(usage) = parsed.get("usage")
        && !usage.is_null()
    {
        events.push(Ok(StreamEvent::Usage(parse_usage(usage))));
    }
    events
}

#[async_trait]
impl ChatModel for TogetherLlm {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn base_classes(&self) -> &'static [&'static str] {
        Self::BASE_CLASSES
    }

    async fn generate(
        &self,
        messages: &[Message],
        options: &GenerateOptions,
    ) -> error::Result<GenerateResult> {
        let body = self.request_body(messages, options, false);
        let resp = self.send(&body).await?;
        let resp_body: serde_json::Value = resp.json().await.map_err(|e| {
            NodeError::provider(PROVIDER, format!("Failed to parse response: {e}"))
        })?;
        Self::parse_response(&resp_body)
    }

    async fn stream(
        &self,
        messages: &[Message],
        options: &GenerateOptions,
    ) -> error::Result<BoxStream> {
        let body = self.request_body(messages, options, true);
        let resp = self.send(&body).await?;

        let stream = resp
            .bytes_stream()
            .eventsource()
            .map(|event| match event {
                Ok(event) => futures::stream::iter(parse_chunk(&event.data)),
                Err(e) => futures::stream::iter(vec![Err(NodeError::Stream {
                    message: e.to_string(),
                    source: Some(Box::new(e)),
                })]),
            })
            .flatten()
            .boxed();

        Ok(Box::new(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_chunk_text_and_finish() {
        let events = parse_chunk(
            r#"{"choices":[{"delta":{"content":"Hi"},"finish_reason":"stop"}]}"#,
        );
        let events: Vec<_> = events.into_iter().map(|e| e.unwrap()).collect();
        assert_eq!(
            events,
            vec![
                StreamEvent::TextDelta("Hi".into()),
                StreamEvent::FinishReason(FinishReason::Stop),
            ]
        );
    }

    #[test]
    fn parse_chunk_done_marker() {
        let events = parse_chunk("[DONE]");
        assert!(events[0].as_ref().unwrap().is_done());
    }

    #[test]
    fn parse_chunk_rejects_garbage() {
        let events = parse_chunk("{not json");
        assert!(matches!(events[0], Err(NodeError::Stream { .. })));
    }

    #[test]
    fn timeout_falls_back_when_not_positive() {
        assert_eq!(effective_timeout_ms(None), crate::provider::DEFAULT_TIMEOUT_MS);
        assert_eq!(effective_timeout_ms(Some(1500)), 1500);
        assert_eq!(effective_timeout_ms(Some(-1)), crate::provider::DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = TogetherLlmConfig::new("m", "sk-super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
