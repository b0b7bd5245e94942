//! Minimal conversational activity shape
//!
//! The full activity schema (attachments, channel metadata, cards) belongs
//! to the hosting channel layer. The engine only reads message text and
//! conversation-update membership, and hands reply activities back to the
//! host for delivery. It never performs delivery itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One inbound or outbound conversational event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: ActivityKind,
}

/// The event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityKind {
    /// A user or bot message.
    Message { text: String },
    /// Members joined the conversation.
    ConversationUpdate { members_added: Vec<String> },
}

impl Activity {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind: ActivityKind::Message { text: text.into() },
        }
    }

    pub fn conversation_update(members_added: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind: ActivityKind::ConversationUpdate { members_added },
        }
    }

    /// Message text, if this is a message activity.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ActivityKind::Message { text } => Some(text),
            ActivityKind::ConversationUpdate { .. } => None,
        }
    }
}
