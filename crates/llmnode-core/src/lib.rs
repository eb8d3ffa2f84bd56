//! # llmnode
//!
//! Chat-model nodes for visual workflow builders. Each node declares a
//! form schema for the host and, at execution time, turns resolved inputs
//! plus a credential into a ready-to-use chat client.

pub mod config;
pub mod context;
pub mod credential;
pub mod error;
pub mod inputs;
pub mod message;
pub mod node;
pub mod nodes;
pub mod provider;
pub mod registry;
pub mod streaming;

/// Shared pointer used for nodes, resolvers and clients.
pub type Shared<T> = std::sync::Arc<T>;

pub use context::ExecutionContext;
pub use credential::{CredentialData, CredentialResolver};
pub use error::NodeError;
pub use inputs::NodeData;
pub use message::{Message, Role};
pub use node::{ChatModelNode, NodeDescriptor};
pub use nodes::ChatTogetherAiNode;
pub use provider::{ChatModel, GenerateOptions};
pub use provider::together::{TogetherLlm, TogetherLlmConfig};
pub use registry::{NodeRegistry, register_all_nodes};
pub use streaming::StreamEvent;
