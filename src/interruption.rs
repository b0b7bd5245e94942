//! Global interruption filter
//!
//! Every inbound turn passes through this filter before the active step
//! sees it. A match always short-circuits the waterfall: cancel unwinds the
//! whole stack, help answers and resumes the interrupted prompt in place.
//!
//! Keywords default to cancel/quit and help/?; both sets and every
//! user-visible message are configurable per policy.

use crate::dialog::TurnInput;

/// Outcome of the filter for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    Cancel,
    Help,
}

/// Keyword and intent matching rules plus the filter's user-visible text.
#[derive(Debug, Clone)]
pub struct InterruptionPolicy {
    cancel_keywords: Vec<String>,
    help_keywords: Vec<String>,
    cancel_intent: String,
    help_intent: String,
    /// Minimum recognizer confidence for an intent to count.
    min_intent_score: f32,
    pub cancel_message: String,
    pub nothing_to_cancel_message: String,
    pub help_message: String,
    pub retries_exhausted_message: String,
}

impl Default for InterruptionPolicy {
    fn default() -> Self {
        Self {
            cancel_keywords: vec!["cancel".to_string(), "quit".to_string()],
            help_keywords: vec!["help".to_string(), "?".to_string()],
            cancel_intent: "Cancel".to_string(),
            help_intent: "Help".to_string(),
            min_intent_score: 0.7,
            cancel_message: "Ok, I've cancelled that.".to_string(),
            nothing_to_cancel_message: "There's nothing to cancel.".to_string(),
            help_message: "Answer the question to continue, or say \"cancel\" to stop."
                .to_string(),
            retries_exhausted_message: "Sorry, I'm not getting a valid answer. Let's stop here."
                .to_string(),
        }
    }
}

impl InterruptionPolicy {
    /// Add a cancel keyword, e.g. `logout` for bots with an auth session.
    pub fn with_cancel_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.cancel_keywords.push(keyword.into().to_lowercase());
        self
    }

    pub fn with_help_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.help_keywords.push(keyword.into().to_lowercase());
        self
    }

    pub fn with_min_intent_score(mut self, score: f32) -> Self {
        self.min_intent_score = score;
        self
    }

    /// Decide whether this turn interrupts the active dialog.
    ///
    /// A recognized intent at or above the confidence threshold takes
    /// precedence; otherwise the trimmed message is compared to the keyword
    /// sets, case-insensitively and whole-message.
    pub fn check(&self, input: &TurnInput) -> Option<Interruption> {
        if let Some(intent) = &input.intent {
            if intent.score >= self.min_intent_score {
                if intent.intent.eq_ignore_ascii_case(&self.cancel_intent) {
                    return Some(Interruption::Cancel);
                }
                if intent.intent.eq_ignore_ascii_case(&self.help_intent) {
                    return Some(Interruption::Help);
                }
            }
        }

        let text = input.text.trim().to_lowercase();
        if self.cancel_keywords.iter().any(|k| *k == text) {
            Some(Interruption::Cancel)
        } else if self.help_keywords.iter().any(|k| *k == text) {
            Some(Interruption::Help)
        } else {
            None
        }
    }
}
