//! Per-turn driver around the pure dispatcher
//!
//! One inbound activity is one discrete unit of work: load state, run the
//! turn to completion, persist, hand the replies back to the host.
//! Sequencing of turns within a conversation is the host's responsibility;
//! the service performs plain read-modify-write against the store.

use crate::activity::{Activity, ActivityKind};
use crate::dialog::{run_turn, ConversationState, TurnInput};
use crate::error::ServiceError;
use crate::interruption::InterruptionPolicy;
use crate::recognizer::{IntentScore, Recognizer};
use crate::registry::DialogRegistry;
use crate::runtime::store::StateStore;
use std::sync::Arc;

const DEFAULT_APOLOGY: &str = "Sorry, it looks like something went wrong.";

/// Turn-based dialog service for one registry and one root dialog.
pub struct DialogService<S: StateStore> {
    registry: Arc<DialogRegistry>,
    policy: InterruptionPolicy,
    root: String,
    store: S,
    recognizer: Option<Arc<dyn Recognizer>>,
    welcome_message: Option<String>,
    apology_message: String,
}

impl<S: StateStore> DialogService<S> {
    pub fn new(registry: Arc<DialogRegistry>, root: impl Into<String>, store: S) -> Self {
        Self {
            registry,
            policy: InterruptionPolicy::default(),
            root: root.into(),
            store,
            recognizer: None,
            welcome_message: None,
            apology_message: DEFAULT_APOLOGY.to_string(),
        }
    }

    pub fn with_policy(mut self, policy: InterruptionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn Recognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Message sent for each member added on a conversation update.
    pub fn with_welcome(mut self, text: impl Into<String>) -> Self {
        self.welcome_message = Some(text.into());
        self
    }

    pub fn with_apology(mut self, text: impl Into<String>) -> Self {
        self.apology_message = text.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process one inbound activity and return the replies to deliver.
    pub async fn process(
        &self,
        conv_id: &str,
        activity: &Activity,
    ) -> Result<Vec<Activity>, ServiceError> {
        match &activity.kind {
            ActivityKind::ConversationUpdate { members_added } => Ok(self.welcome(members_added)),
            ActivityKind::Message { text } => self.process_message(conv_id, text).await,
        }
    }

    fn welcome(&self, members_added: &[String]) -> Vec<Activity> {
        match &self.welcome_message {
            Some(welcome) => members_added
                .iter()
                .map(|_| Activity::message(welcome.clone()))
                .collect(),
            None => Vec::new(),
        }
    }

    async fn process_message(
        &self,
        conv_id: &str,
        text: &str,
    ) -> Result<Vec<Activity>, ServiceError> {
        let state = self.store.load(conv_id).await?.unwrap_or_default();
        let input = TurnInput {
            text: text.to_string(),
            intent: self.recognize(conv_id, text).await,
        };

        match run_turn(&self.registry, &self.policy, &self.root, &state, &input) {
            Ok(outcome) => {
                tracing::debug!(
                    conv_id = %conv_id,
                    status = ?outcome.result.status,
                    depth = outcome.state.stack.depth(),
                    "turn processed"
                );
                self.store.save(conv_id, &outcome.state).await?;
                Ok(outcome.replies.into_iter().map(Activity::message).collect())
            }
            Err(e) => {
                // Fail open: apologize and reset the conversation so the
                // fault is not replayed on the next turn.
                tracing::error!(conv_id = %conv_id, error = %e, "turn failed, resetting conversation");
                self.store
                    .save(conv_id, &ConversationState::default())
                    .await?;
                Ok(vec![Activity::message(self.apology_message.clone())])
            }
        }
    }

    async fn recognize(&self, conv_id: &str, text: &str) -> Option<IntentScore> {
        let recognizer = self.recognizer.as_ref()?;
        match recognizer.recognize(text).await {
            Ok(intent) => intent,
            Err(e) => {
                // Recognizer outage is not fatal to the turn.
                tracing::warn!(conv_id = %conv_id, error = %e, "recognizer unavailable, continuing without intent");
                None
            }
        }
    }
}
