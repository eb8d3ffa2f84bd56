//! Node declarations — the static self-description a host renders and matches on.
//!
//! A node is an immutable [`NodeDescriptor`] plus a factory. The descriptor
//! serialises to the camelCase JSON shape workflow hosts read
//! (`baseClasses`, `credentialNames`, `additionalParams`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Shared;
use crate::context::ExecutionContext;
use crate::error;
use crate::inputs::NodeData;
use crate::provider::ChatModel;

/// Value kind of an input field; drives the host's form widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    String,
    Number,
    Options,
}

/// One entry of an `options` input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOption {
    pub label: String,
    pub name: String,
}

impl InputOption {
    /// Option whose label is its value.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
        }
    }
}

/// A configurable input declared by a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputParam {
    pub label: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub optional: bool,
    /// Rendered under the "additional parameters" fold.
    #[serde(default)]
    pub additional_params: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<InputOption>,
}

impl InputParam {
    pub fn new(label: impl Into<String>, name: impl Into<String>, kind: InputKind) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            kind,
            default: None,
            optional: false,
            additional_params: false,
            step: None,
            options: Vec::new(),
        }
    }

    pub fn default_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn additional(mut self) -> Self {
        self.additional_params = true;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn options(mut self, options: Vec<InputOption>) -> Self {
        self.options = options;
        self
    }

    /// True if `value` is one of the declared options.
    pub fn allows(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.name == value)
    }
}

/// Credential requirement: exactly one credential of the listed kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialParam {
    pub label: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub credential_names: Vec<String>,
}

impl CredentialParam {
    pub fn new(credential_name: impl Into<String>) -> Self {
        Self {
            label: "Connect Credential".to_string(),
            name: "credential".to_string(),
            kind: "credential".to_string(),
            credential_names: vec![credential_name.into()],
        }
    }
}

/// Static self-description of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    pub label: String,
    pub name: String,
    pub version: f32,
    #[serde(rename = "type")]
    pub node_type: String,
    pub icon: String,
    pub category: String,
    pub description: String,
    pub base_classes: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub credential: CredentialParam,
    pub inputs: Vec<InputParam>,
}

impl NodeDescriptor {
    pub fn input(&self, name: &str) -> Option<&InputParam> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Declared default of an input, if any.
    pub fn default_of(&self, name: &str) -> Option<&serde_json::Value> {
        self.input(name).and_then(|p| p.default.as_ref())
    }

    pub fn to_json(&self) -> error::Result<serde_json::Value> {
        serde_json::to_value(self)
            .map_err(|e| error::NodeError::internal(format!("Failed to serialize descriptor: {e}")))
    }
}

/// Compose capability tags: the node's own type, its host marker, then the
/// client's tags. Duplicates are dropped, first occurrence wins.
pub fn base_classes(node_type: &str, marker: &str, client_tags: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(client_tags.len() + 2);
    for tag in [node_type, marker].into_iter().chain(client_tags.iter().copied()) {
        if !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// A node that produces a chat model for the host graph.
#[async_trait]
pub trait ChatModelNode: Send + Sync {
    fn descriptor(&self) -> &NodeDescriptor;

    /// Build a fresh client from resolved inputs. Called once per execution.
    async fn init(
        &self,
        node_data: &NodeData,
        ctx: &ExecutionContext,
    ) -> error::Result<Shared<dyn ChatModel>>;
}
