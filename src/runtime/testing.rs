//! Test harness for scripted conversations
//!
//! Wraps a [`DialogService`] so tests can exchange plain strings with the
//! bot and inspect the persisted conversation state between turns.

use crate::activity::Activity;
use crate::dialog::ConversationState;
use crate::runtime::service::DialogService;
use crate::runtime::store::StateStore;

pub struct TestBot<'a, S: StateStore> {
    service: &'a DialogService<S>,
    conv_id: String,
}

impl<'a, S: StateStore> TestBot<'a, S> {
    pub fn new(service: &'a DialogService<S>) -> Self {
        Self::with_conversation(service, "test-conv")
    }

    pub fn with_conversation(service: &'a DialogService<S>, conv_id: &str) -> Self {
        Self {
            service,
            conv_id: conv_id.to_string(),
        }
    }

    /// Deliver a conversation update for one joining member.
    pub async fn join(&self, member: &str) -> Vec<String> {
        let activity = Activity::conversation_update(vec![member.to_string()]);
        self.exchange(&activity).await
    }

    /// Deliver one user message and collect the bot's reply texts.
    pub async fn send(&self, text: &str) -> Vec<String> {
        let activity = Activity::message(text);
        self.exchange(&activity).await
    }

    /// The persisted state after the last turn.
    pub async fn state(&self) -> ConversationState {
        self.service
            .store()
            .load(&self.conv_id)
            .await
            .expect("load state")
            .unwrap_or_default()
    }

    async fn exchange(&self, activity: &Activity) -> Vec<String> {
        self.service
            .process(&self.conv_id, activity)
            .await
            .expect("process turn")
            .into_iter()
            .filter_map(|reply| reply.text().map(str::to_string))
            .collect()
    }
}
