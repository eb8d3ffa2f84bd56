//! Execution context handed to a node factory by the host.

use std::collections::HashMap;

use crate::Shared;
use crate::credential::CredentialResolver;

/// Everything a node needs from the host at `init` time.
#[derive(Clone)]
pub struct ExecutionContext {
    /// Identifier of this execution, used for log correlation.
    pub execution_id: String,
    /// Flow the node belongs to, if the host tracks one.
    pub chatflow_id: Option<String>,
    pub resolver: Shared<dyn CredentialResolver>,
    /// Free-form host data (workspace id, caller, ...).
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ExecutionContext {
    pub fn new(resolver: Shared<dyn CredentialResolver>) -> Self {
        Self {
            execution_id: uuid::Uuid::new_v4().to_string(),
            chatflow_id: None,
            resolver,
            metadata: HashMap::new(),
        }
    }

    pub fn with_chatflow_id(mut self, id: impl Into<String>) -> Self {
        self.chatflow_id = Some(id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("execution_id", &self.execution_id)
            .field("chatflow_id", &self.chatflow_id)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
