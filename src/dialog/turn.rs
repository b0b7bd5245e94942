//! Turn input and outcome types

use crate::dialog::stack::ConversationState;
use crate::recognizer::IntentScore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Completion status of one processed turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    /// Suspended, awaiting the next user message.
    Waiting,
    /// The root dialog finished.
    Complete,
    /// The stack was unwound by an interruption or retry exhaustion.
    Cancelled,
}

/// Status plus optional payload, produced by a step and consumed by the
/// stack dispatcher. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub status: TurnStatus,
    pub payload: Option<Value>,
}

impl TurnResult {
    pub fn waiting() -> Self {
        Self {
            status: TurnStatus::Waiting,
            payload: None,
        }
    }

    pub fn complete(payload: Option<Value>) -> Self {
        Self {
            status: TurnStatus::Complete,
            payload,
        }
    }

    pub fn cancelled() -> Self {
        Self {
            status: TurnStatus::Cancelled,
            payload: None,
        }
    }
}

/// The inbound half of one turn: message text, plus the top-scoring intent
/// if an external recognizer produced one.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnInput {
    pub text: String,
    pub intent: Option<IntentScore>,
}

impl TurnInput {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            intent: None,
        }
    }

    pub fn with_intent(mut self, intent: IntentScore) -> Self {
        self.intent = Some(intent);
        self
    }
}

/// Everything a processed turn hands back to the runtime shell: the next
/// conversation state, the replies to deliver, and the turn's result.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub state: ConversationState,
    pub replies: Vec<String>,
    pub result: TurnResult,
}
