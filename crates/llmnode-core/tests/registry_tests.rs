use std::sync::Arc;

use async_trait::async_trait;
use llmnode_core::Shared;
use llmnode_core::context::ExecutionContext;
use llmnode_core::error::{self, NodeError};
use llmnode_core::inputs::NodeData;
use llmnode_core::node::{ChatModelNode, NodeDescriptor};
use llmnode_core::nodes::together;
use llmnode_core::provider::ChatModel;
use llmnode_core::registry::{NodeRegistry, register_all_nodes};

/// Node that shares the TogetherAI descriptor but refuses to build.
struct StubNode {
    descriptor: NodeDescriptor,
}

#[async_trait]
impl ChatModelNode for StubNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    async fn init(
        &self,
        _node_data: &NodeData,
        _ctx: &ExecutionContext,
    ) -> error::Result<Shared<dyn ChatModel>> {
        Err(NodeError::internal("stub"))
    }
}

#[test]
fn test_register_all_nodes() {
    let mut registry = NodeRegistry::new();
    assert!(registry.is_empty());

    register_all_nodes(&mut registry);

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.list(), vec![together::NODE_NAME]);
    let node = registry.get(together::NODE_NAME).expect("node registered");
    assert_eq!(node.descriptor().label, "ChatTogetherAI");
    assert_eq!(registry.descriptors()[0].category, "Chat Models");
}

#[test]
fn test_get_nonexistent() {
    let registry = NodeRegistry::new();
    assert!(registry.get("chatOpenAI").is_none());
}

#[test]
fn test_register_replaces_same_name() {
    let mut registry = NodeRegistry::new();
    register_all_nodes(&mut registry);

    let replaced = registry.register(Arc::new(StubNode {
        descriptor: together::descriptor(),
    }));
    assert!(replaced.is_some());
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_registered_node_errors_propagate() {
    let mut registry = NodeRegistry::new();
    registry.register(Arc::new(StubNode {
        descriptor: together::descriptor(),
    }));

    let ctx = ExecutionContext::new(Arc::new(
        llmnode_core::credential::InMemoryCredentialResolver::new(),
    ));
    let node = registry.get(together::NODE_NAME).unwrap();
    let result = node.init(&NodeData::new("n"), &ctx).await;
    assert!(matches!(result, Err(NodeError::Internal { .. })));
}
