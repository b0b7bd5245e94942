//! Core interruptible waterfall dialog engine
//!
//! Dialogs are data: a descriptor is an ordered list of steps, interpreted
//! by a single pure dispatcher. Per-conversation progress lives in a
//! serializable stack of frames, so "waiting for the next turn" is plain
//! persisted state rather than a language-level continuation.

mod descriptor;
mod interpreter;
mod stack;
mod turn;

#[cfg(test)]
mod proptests;

pub use descriptor::{DialogDescriptor, PromptStep, Step, Validator};
pub use interpreter::{run_turn, LAST_RESULT_KEY};
pub use stack::{ConversationState, DialogStack, StackFrame};
pub use turn::{TurnInput, TurnOutcome, TurnResult, TurnStatus};
