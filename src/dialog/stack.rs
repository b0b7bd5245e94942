//! Dialog stack and per-conversation state

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One active dialog on the stack.
///
/// Owned exclusively by the conversation's stack; never shared across
/// conversations. `locals` holds the slot values collected so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackFrame {
    pub dialog_id: String,
    pub step_index: usize,
    /// Failed validation attempts against the current prompt.
    #[serde(default)]
    pub retries: u32,
    #[serde(default)]
    pub locals: Map<String, Value>,
}

impl StackFrame {
    pub fn new(dialog_id: impl Into<String>) -> Self {
        Self {
            dialog_id: dialog_id.into(),
            step_index: 0,
            retries: 0,
            locals: Map::new(),
        }
    }
}

/// Ownership-ordered stack of active dialogs for one conversation.
///
/// Only the top frame receives turns; frames beneath it are suspended and
/// mutated only when a child pops and delivers its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DialogStack {
    frames: Vec<StackFrame>,
}

impl DialogStack {
    pub fn push(&mut self, frame: StackFrame) {
        self.frames.push(frame);
    }

    /// Pop the active frame. Popping an empty stack is a no-op.
    pub fn pop(&mut self) -> Option<StackFrame> {
        self.frames.pop()
    }

    /// Unconditionally empty the stack.
    pub fn cancel_all(&mut self) {
        self.frames.clear();
    }

    pub fn top(&self) -> Option<&StackFrame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut StackFrame> {
        self.frames.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Per-conversation state: the serialized dialog stack plus a bag of named
/// values scoped to the conversation.
///
/// Created on the first turn, mutated every turn, persisted by the store
/// after each turn. Retention is the store's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConversationState {
    pub stack: DialogStack,
    #[serde(default)]
    pub bag: Map<String, Value>,
}
