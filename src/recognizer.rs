//! Intent recognition seam
//!
//! External AI services (intent classification, knowledge-base lookup) are
//! opaque collaborators: the dialog layer only ever consumes the
//! top-scoring intent and its confidence. The trait keeps that seam
//! mockable; [`KeywordRecognizer`] is a literal-matching stand-in for hosts
//! without a real service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Top-scoring intent for one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentScore {
    pub intent: String,
    pub score: f32,
}

impl IntentScore {
    pub fn new(intent: impl Into<String>, score: f32) -> Self {
        Self {
            intent: intent.into(),
            score,
        }
    }
}

/// Recognizer failure. The runtime shell treats this as non-fatal and
/// continues the turn without an intent.
#[derive(Debug, Error)]
#[error("recognizer: {0}")]
pub struct RecognizerError(pub String);

/// Maps an utterance to its top-scoring intent, if any.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, text: &str) -> Result<Option<IntentScore>, RecognizerError>;
}

#[async_trait]
impl<T: Recognizer + ?Sized> Recognizer for Arc<T> {
    async fn recognize(&self, text: &str) -> Result<Option<IntentScore>, RecognizerError> {
        (**self).recognize(text).await
    }
}

/// Literal keyword-to-intent table. Matches the whole trimmed utterance,
/// case-insensitively, with full confidence.
#[derive(Debug, Clone, Default)]
pub struct KeywordRecognizer {
    entries: Vec<(String, String)>,
}

impl KeywordRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(mut self, keyword: impl Into<String>, intent: impl Into<String>) -> Self {
        self.entries
            .push((keyword.into().to_lowercase(), intent.into()));
        self
    }
}

#[async_trait]
impl Recognizer for KeywordRecognizer {
    async fn recognize(&self, text: &str) -> Result<Option<IntentScore>, RecognizerError> {
        let needle = text.trim().to_lowercase();
        Ok(self
            .entries
            .iter()
            .find(|(keyword, _)| *keyword == needle)
            .map(|(_, intent)| IntentScore::new(intent.clone(), 1.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keyword_recognizer_matches_case_insensitively() {
        let recognizer = KeywordRecognizer::new()
            .map("never mind", "Cancel")
            .map("what can you do", "Help");

        let hit = recognizer.recognize("  Never MIND ").await.expect("ok");
        assert_eq!(hit, Some(IntentScore::new("Cancel", 1.0)));

        let miss = recognizer.recognize("book a flight").await.expect("ok");
        assert_eq!(miss, None);
    }
}
