//! ChatTogetherAI node — builds a [`TogetherLlm`] from host inputs.

use async_trait::async_trait;
use tracing::Instrument;

use crate::Shared;
use crate::context::ExecutionContext;
use crate::credential::{get_credential_data, get_credential_param};
use crate::error;
use crate::inputs::{NodeData, parse_float, parse_int};
use crate::node::{
    ChatModelNode, CredentialParam, InputKind, InputOption, InputParam, NodeDescriptor,
    base_classes,
};
use crate::provider::ChatModel;
use crate::provider::together::{TogetherLlm, TogetherLlmConfig};

pub const NODE_NAME: &str = "chatTogetherAI_LlamaIndex";
pub const NODE_TYPE: &str = "ChatTogetherAI";
/// Marks chat models usable by the LlamaIndex side of the host.
pub const CHAT_MODEL_MARKER: &str = "BaseChatModel_LlamaIndex";
pub const CREDENTIAL_NAME: &str = "togetherAIApi";
pub const API_KEY_FIELD: &str = "togetherAIApiKey";

pub const DEFAULT_MODEL: &str = "NousResearch/Nous-Hermes-2-Mistral-7B-DPO";
pub const DEFAULT_TEMPERATURE: f64 = 0.9;

pub const MODELS: [&str; 7] = [
    "mistralai/Mixtral-8x7B-Instruct-v0.1",
    "mistralai/Mistral-7B-Instruct-v0.1",
    "mistralai/Mistral-7B-Instruct-v0.2",
    "NousResearch/Nous-Hermes-2-Mistral-7B-DPO",
    "NousResearch/Nous-Hermes-2-Mixtral-8x7B-DPO",
    "NousResearch/Nous-Hermes-2-Mixtral-8x7B-SFT",
    "teknium/OpenHermes-2p5-Mistral-7B",
];

/// The TogetherAI chat node.
pub struct ChatTogetherAiNode {
    descriptor: NodeDescriptor,
}

impl Default for ChatTogetherAiNode {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTogetherAiNode {
    pub fn new() -> Self {
        Self {
            descriptor: descriptor(),
        }
    }
}

/// Declaration read by the host at registration time.
pub fn descriptor() -> NodeDescriptor {
    NodeDescriptor {
        label: "ChatTogetherAI".to_string(),
        name: NODE_NAME.to_string(),
        version: 1.0,
        node_type: NODE_TYPE.to_string(),
        icon: "togetherai.png".to_string(),
        category: "Chat Models".to_string(),
        description: "Wrapper around TogetherAI large language models that use the Chat endpoint specific for LlamaIndex".to_string(),
        base_classes: base_classes(NODE_TYPE, CHAT_MODEL_MARKER, TogetherLlm::BASE_CLASSES),
        tags: vec!["LlamaIndex".to_string()],
        credential: CredentialParam::new(CREDENTIAL_NAME),
        inputs: vec![
            InputParam::new("Model Name", "modelName", InputKind::Options)
                .options(MODELS.iter().map(|m| InputOption::named(*m)).collect())
                .default_value(DEFAULT_MODEL)
                .optional(),
            InputParam::new("Temperature", "temperature", InputKind::Number)
                .step(0.1)
                .default_value(DEFAULT_TEMPERATURE)
                .optional(),
            InputParam::new("Max Tokens", "maxTokens", InputKind::Number)
                .step(1.0)
                .optional()
                .additional(),
            InputParam::new("Top Probability", "topP", InputKind::Number)
                .step(0.1)
                .optional()
                .additional(),
            InputParam::new("Timeout", "timeout", InputKind::Number)
                .step(1.0)
                .optional()
                .additional(),
        ],
    }
}

/// Build the client configuration and construct the client.
///
/// Only the credential lookup can fail here. Malformed numbers never do:
/// a bad temperature becomes NaN and a non-numeric integer is left
/// unset. Parsed integers are passed on without range checks.
pub async fn init_chat_together_ai(
    node_data: &NodeData,
    ctx: &ExecutionContext,
) -> error::Result<TogetherLlm> {
    let span = tracing::info_span!(
        "node_init",
        node = NODE_NAME,
        node_id = %node_data.id,
        execution_id = %ctx.execution_id,
    );

    async move {
        let credential_data =
            get_credential_data(node_data.credential.as_deref().unwrap_or_default(), ctx).await?;
        let api_key = get_credential_param(API_KEY_FIELD, &credential_data, node_data)?;

        let temperature = match node_data.input_str("temperature") {
            Some(raw) if !raw.is_empty() => parse_float(&raw),
            _ => DEFAULT_TEMPERATURE,
        };
        let model = match node_data.input_str("modelName") {
            Some(raw) if !raw.is_empty() => raw,
            _ => DEFAULT_MODEL.to_string(),
        };
        if !MODELS.contains(&model.as_str()) {
            tracing::debug!(%model, "Model is not in the declared options");
        }

        let mut config = TogetherLlmConfig {
            temperature,
            model,
            api_key,
            max_tokens: None,
            top_p: None,
            timeout: None,
        };

        if node_data.has_input("maxTokens") {
            config.max_tokens = optional_int(node_data, "maxTokens");
        }
        if node_data.has_input("topP") {
            config.top_p = node_data.input_str("topP").map(|raw| parse_float(&raw));
        }
        if node_data.has_input("timeout") {
            config.timeout = optional_int(node_data, "timeout");
        }

        tracing::debug!(
            model = %config.model,
            temperature = config.temperature,
            max_tokens = ?config.max_tokens,
            top_p = ?config.top_p,
            timeout = ?config.timeout,
            "Constructing TogetherAI client"
        );

        TogetherLlm::new(config)
    }
    .instrument(span)
    .await
}

fn optional_int(node_data: &NodeData, name: &str) -> Option<i64> {
    let raw = node_data.input_str(name)?;
    let parsed = parse_int(&raw);
    if parsed.is_none() {
        tracing::warn!(input = name, value = %raw, "Ignoring non-numeric input");
    }
    parsed
}

#[async_trait]
impl ChatModelNode for ChatTogetherAiNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    async fn init(
        &self,
        node_data: &NodeData,
        ctx: &ExecutionContext,
    ) -> error::Result<Shared<dyn ChatModel>> {
        let llm = init_chat_together_ai(node_data, ctx).await?;
        Ok(Shared::new(llm))
    }
}
