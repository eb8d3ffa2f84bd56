use serde::{Deserialize, Serialize};

use crate::message::Usage;
use crate::provider::FinishReason;

/// Events emitted during streaming generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A text delta (partial token).
    TextDelta(String),

    /// Generation finished with a reason.
    FinishReason(FinishReason),

    /// Token usage statistics.
    Usage(Usage),

    /// Stream completed.
    Done,
}

impl StreamEvent {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::TextDelta(t) => Some(t),
            _ => None,
        }
    }
}
