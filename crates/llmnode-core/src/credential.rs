//! Credential resolution — turns an opaque credential reference into secret fields.
//!
//! The host owns the vault; nodes only see a [`CredentialResolver`]. Secret
//! values are held as [`SecretString`] and never appear in `Debug` output or logs.

use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::context::ExecutionContext;
use crate::error::{self, NodeError};
use crate::inputs::NodeData;

/// Decrypted fields of one credential.
#[derive(Default)]
pub struct CredentialData {
    fields: HashMap<String, SecretString>,
}

impl CredentialData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), SecretString::from(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&SecretString> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl std::fmt::Debug for CredentialData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<_> = self.fields.keys().collect();
        keys.sort();
        f.debug_struct("CredentialData")
            .field("fields", &keys)
            .finish()
    }
}

/// Host-side secret lookup.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn resolve(
        &self,
        credential_id: &str,
        ctx: &ExecutionContext,
    ) -> error::Result<CredentialData>;
}

/// Resolve the node's credential reference through the context's resolver.
pub async fn get_credential_data(
    credential_id: &str,
    ctx: &ExecutionContext,
) -> error::Result<CredentialData> {
    if credential_id.trim().is_empty() {
        return Err(NodeError::credential("No credential selected"));
    }
    ctx.resolver.resolve(credential_id, ctx).await
}

/// Read one credential field, falling back to an input of the same name.
pub fn get_credential_param(
    key: &str,
    data: &CredentialData,
    node_data: &NodeData,
) -> error::Result<SecretString> {
    if let Some(value) = data.get(key) {
        return Ok(SecretString::from(value.expose_secret().to_string()));
    }
    node_data
        .input_str(key)
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| NodeError::credential(format!("Credential field '{key}' not found")))
}

// ---------------------------------------------------------------------------
// In-memory resolver
// ---------------------------------------------------------------------------

/// Resolver backed by a fixed map of credential id -> fields.
#[derive(Default)]
pub struct InMemoryCredentialResolver {
    credentials: HashMap<String, HashMap<String, SecretString>>,
}

impl InMemoryCredentialResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential<K, V>(
        mut self,
        credential_id: impl Into<String>,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), SecretString::from(v.into())))
            .collect();
        self.credentials.insert(credential_id.into(), fields);
        self
    }
}

#[async_trait]
impl CredentialResolver for InMemoryCredentialResolver {
    async fn resolve(
        &self,
        credential_id: &str,
        _ctx: &ExecutionContext,
    ) -> error::Result<CredentialData> {
        let fields = self
            .credentials
            .get(credential_id)
            .ok_or_else(|| NodeError::credential(format!("Credential '{credential_id}' not found")))?;

        let mut data = CredentialData::new();
        for (k, v) in fields {
            data.insert(k.clone(), v.expose_secret());
        }
        Ok(data)
    }
}

// ---------------------------------------------------------------------------
// Environment resolver
// ---------------------------------------------------------------------------

/// Resolver that reads fields from environment variables.
///
/// Each mapping value may be a bare variable name or `${VAR}`. Any
/// credential id resolves to the same fields; an unset variable fails the
/// lookup.
#[derive(Debug, Default)]
pub struct EnvCredentialResolver {
    mappings: Vec<(String, String)>,
}

impl EnvCredentialResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, env_var: impl Into<String>) -> Self {
        self.mappings.push((key.into(), env_var.into()));
        self
    }
}

#[async_trait]
impl CredentialResolver for EnvCredentialResolver {
    async fn resolve(
        &self,
        credential_id: &str,
        _ctx: &ExecutionContext,
    ) -> error::Result<CredentialData> {
        let mut data = CredentialData::new();
        for (key, var) in &self.mappings {
            let reference = if var.starts_with("${") {
                var.clone()
            } else {
                format!("${{{var}}}")
            };
            let value = crate::config::resolve_env(&reference);
            if value.is_empty() {
                return Err(NodeError::credential(format!(
                    "Credential '{credential_id}': environment variable for '{key}' is not set"
                )));
            }
            data.insert(key.clone(), value);
        }
        Ok(data)
    }
}
