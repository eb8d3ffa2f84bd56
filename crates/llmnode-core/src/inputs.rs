//! Resolved node inputs and the loose numeric coercion the host expects.
//!
//! Workflow hosts hand every input over as a string (numbers typed into a UI
//! stepper included). Coercion follows the host's scripting conventions:
//! `parse_float` behaves like `parseFloat`, `parse_int` like `parseInt(s, 10)`.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("float prefix pattern is valid")
});

static INT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("int prefix pattern is valid"));

/// Inputs and credential reference supplied by the host for one execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub inputs: HashMap<String, serde_json::Value>,
    /// Opaque credential reference, resolved by a [`crate::credential::CredentialResolver`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl NodeData {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.inputs.insert(name.into(), value.into());
        self
    }

    pub fn with_credential(mut self, credential_id: impl Into<String>) -> Self {
        self.credential = Some(credential_id.into());
        self
    }

    /// Raw input rendered as a string. Null and missing inputs are `None`.
    pub fn input_str(&self, name: &str) -> Option<String> {
        match self.inputs.get(name)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// True if the input is present and truthy (see [`is_truthy`]).
    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.get(name).is_some_and(is_truthy)
    }
}

/// Parse the longest leading decimal literal; NaN when there is none.
pub fn parse_float(raw: &str) -> f64 {
    let s = raw.trim_start();
    let Some(m) = FLOAT_PREFIX.find(s) else {
        return f64::NAN;
    };
    let literal = m.as_str();
    match literal.trim_start_matches(['+', '-']) {
        "Infinity" if literal.starts_with('-') => f64::NEG_INFINITY,
        "Infinity" => f64::INFINITY,
        _ => literal.parse().unwrap_or(f64::NAN),
    }
}

/// Parse leading base-10 digits; `None` when there are none. Values past
/// the `i64` range saturate.
pub fn parse_int(raw: &str) -> Option<i64> {
    let digits = INT_PREFIX.find(raw.trim_start())?.as_str();
    match digits.parse() {
        Ok(v) => Some(v),
        Err(_) if digits.starts_with('-') => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

/// Host truthiness for optional inputs.
///
/// Null, `false`, empty strings, zero and NaN are falsy. A string spelling
/// zero (`"0"`, `"0.0"`) is falsy too, so a literal zero always reads as
/// "not set".
pub fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        serde_json::Value::String(s) => !s.is_empty() && parse_float(s) != 0.0,
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}
