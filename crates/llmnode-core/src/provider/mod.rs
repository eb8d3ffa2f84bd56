use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{self, NodeError};
use crate::message::{Message, Usage};
use crate::streaming::StreamEvent;

pub type BoxStream = Box<dyn futures::Stream<Item = error::Result<StreamEvent>> + Send + Unpin>;

/// Default request timeout when the node leaves it unset.
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Per-call overrides layered on top of the client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

/// Result from a non-streaming generation.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub message: Message,
    pub usage: Usage,
    pub finish_reason: FinishReason,
}

impl GenerateResult {
    pub fn text(&self) -> &str {
        &self.message.content
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Error,
    Other(String),
}

impl FinishReason {
    pub fn from_wire(reason: &str) -> Self {
        match reason {
            "stop" | "eos" => FinishReason::Stop,
            "length" => FinishReason::Length,
            "content_filter" => FinishReason::ContentFilter,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

/// A constructed chat client handed back to the host.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn name(&self) -> &str;
    fn model(&self) -> &str;

    /// Capability tags used by the host for edge compatibility.
    fn base_classes(&self) -> &'static [&'static str];

    async fn generate(
        &self,
        messages: &[Message],
        options: &GenerateOptions,
    ) -> error::Result<GenerateResult>;

    async fn stream(
        &self,
        messages: &[Message],
        options: &GenerateOptions,
    ) -> error::Result<BoxStream>;
}

/// Build an HTTP client with the given request timeout.
pub fn build_client(timeout_ms: Option<u64>) -> error::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(
            timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
        ))
        .build()
        .map_err(|e| NodeError::internal(format!("Failed to build HTTP client: {e}")))
}

pub mod together;
