//! Error types for registry construction, turn processing, and the runtime shell

use thiserror::Error;

/// Errors raised while building a [`crate::registry::DialogRegistry`].
///
/// These are configuration faults and are fatal at startup: a registry that
/// fails to build is never handed to the dispatcher.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate dialog id `{0}`")]
    DuplicateDialog(String),

    #[error("dialog `{dialog}` begins unknown child dialog `{child}`")]
    UnknownChild { dialog: String, child: String },

    #[error("dialog `{0}` has no steps")]
    EmptyDialog(String),

    /// A prompt validator was given an invalid regular expression.
    #[error("invalid prompt pattern: {0}")]
    BadPattern(#[from] regex::Error),
}

/// Faults surfaced by the turn dispatcher.
///
/// An unhandled fault inside a step propagates to the caller; the runtime
/// shell logs it, resets the conversation, and replies with a generic
/// apology rather than retrying.
#[derive(Debug, Error)]
pub enum DialogError {
    #[error("unknown dialog `{0}`")]
    UnknownDialog(String),

    /// A message template referenced a slot the frame never collected.
    #[error("template references missing slot `{slot}`")]
    MissingSlot { slot: String },

    /// Persisted state resumed at a step that cannot receive input.
    /// A suspended frame must always be parked on a prompt.
    #[error("dialog `{dialog}` suspended at step {step}, which is not a prompt")]
    CorruptFrame { dialog: String, step: usize },
}

/// Errors from the runtime shell's collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("state store: {0}")]
    Store(String),
}
