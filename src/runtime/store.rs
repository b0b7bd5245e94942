//! Conversation state persistence seam
//!
//! The store is a black box to the engine: state is read at the start of a
//! turn and written at the end, keyed by conversation id, last write wins.

use crate::dialog::ConversationState;
use crate::error::ServiceError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Storage for per-conversation dialog state.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self, conv_id: &str) -> Result<Option<ConversationState>, ServiceError>;

    async fn save(&self, conv_id: &str, state: &ConversationState) -> Result<(), ServiceError>;
}

#[async_trait]
impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    async fn load(&self, conv_id: &str) -> Result<Option<ConversationState>, ServiceError> {
        (**self).load(conv_id).await
    }

    async fn save(&self, conv_id: &str, state: &ConversationState) -> Result<(), ServiceError> {
        (**self).save(conv_id, state).await
    }
}

/// In-process store. Suitable for tests and single-process hosts; anything
/// durable belongs behind the same trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    states: RwLock<HashMap<String, ConversationState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self, conv_id: &str) -> Result<Option<ConversationState>, ServiceError> {
        Ok(self.states.read().await.get(conv_id).cloned())
    }

    async fn save(&self, conv_id: &str, state: &ConversationState) -> Result<(), ServiceError> {
        self.states
            .write()
            .await
            .insert(conv_id.to_string(), state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::StackFrame;

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.load("conv-1").await.expect("load").is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrips_per_conversation() {
        let store = MemoryStore::new();
        let mut state = ConversationState::default();
        state.stack.push(StackFrame::new("onboarding"));

        store.save("conv-1", &state).await.expect("save");

        let loaded = store.load("conv-1").await.expect("load").expect("state");
        assert_eq!(loaded, state);
        assert!(store.load("conv-2").await.expect("load").is_none());
    }
}
