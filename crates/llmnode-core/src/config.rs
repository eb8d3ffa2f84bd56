//! Loading node data from JSON/YAML/TOML.
//!
//! Hosts normally pass `NodeData` directly; these loaders serve fixtures,
//! local runs and hosts that store node configuration as files.

use crate::error::{self, NodeError};
use crate::inputs::NodeData;

/// Resolve environment variable references like ${VAR_NAME}.
pub fn resolve_env(value: &str) -> String {
    if let Some(stripped) = value.strip_prefix("${")
        && let Some(var_name) = stripped.strip_suffix('}')
    {
        return std::env::var(var_name).unwrap_or_default();
    }
    value.to_string()
}

impl NodeData {
    /// Parse from JSON string.
    pub fn from_json(json: &str) -> error::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| NodeError::config(format!("Invalid JSON node data: {e}")))
    }

    /// Parse from YAML string.
    #[cfg(feature = "config-yaml")]
    pub fn from_yaml(yaml: &str) -> error::Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| NodeError::config(format!("Invalid YAML node data: {e}")))
    }

    /// Parse from TOML string.
    #[cfg(feature = "config-toml")]
    pub fn from_toml(toml: &str) -> error::Result<Self> {
        toml::from_str(toml).map_err(|e| NodeError::config(format!("Invalid TOML node data: {e}")))
    }

    /// Detect format from file extension and parse.
    pub fn from_file(path: &str) -> error::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::config(format!("Failed to read node data file '{path}': {e}")))?;

        #[cfg(feature = "config-yaml")]
        if path.ends_with(".yaml") || path.ends_with(".yml") {
            return Self::from_yaml(&content);
        }
        #[cfg(feature = "config-toml")]
        if path.ends_with(".toml") {
            return Self::from_toml(&content);
        }
        Self::from_json(&content)
    }

    /// Replace `${VAR}` string inputs and credential reference with
    /// environment values.
    pub fn resolve_env_refs(mut self) -> Self {
        for value in self.inputs.values_mut() {
            if let serde_json::Value::String(s) = value {
                *s = resolve_env(s);
            }
        }
        self.credential = self.credential.map(|c| resolve_env(&c));
        self
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> error::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NodeError::config(format!("Failed to serialize node data: {e}")))
    }
}
