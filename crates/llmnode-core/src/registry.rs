//! Node registry — name -> node lookup for the host.

use std::collections::HashMap;

use crate::Shared;
use crate::node::{ChatModelNode, NodeDescriptor};

/// Nodes keyed by descriptor name. Registration happens once at startup;
/// lookups are read-only afterwards.
#[derive(Default)]
pub struct NodeRegistry {
    nodes: HashMap<String, Shared<dyn ChatModelNode>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under its descriptor name. A node with the same name
    /// is replaced and returned.
    pub fn register(&mut self, node: Shared<dyn ChatModelNode>) -> Option<Shared<dyn ChatModelNode>> {
        let name = node.descriptor().name.clone();
        tracing::debug!(node = %name, "Registering node");
        self.nodes.insert(name, node)
    }

    pub fn get(&self, name: &str) -> Option<Shared<dyn ChatModelNode>> {
        self.nodes.get(name).cloned()
    }

    /// Registered node names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Descriptors of every registered node, sorted by name.
    pub fn descriptors(&self) -> Vec<&NodeDescriptor> {
        let mut out: Vec<&NodeDescriptor> = self.nodes.values().map(|n| n.descriptor()).collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("nodes", &self.list())
            .finish()
    }
}

/// Register every node this crate ships.
pub fn register_all_nodes(registry: &mut NodeRegistry) {
    registry.register(Shared::new(crate::nodes::ChatTogetherAiNode::new()));
}
