//! cascade: an interruptible multi-step dialog engine
//!
//! The recurring "waterfall" pattern of conversational bots as one
//! coherent library: dialogs are ordered lists of data steps, a pure
//! dispatcher runs one turn at a time against a serializable per-
//! conversation stack, and a global interruption filter (cancel/help)
//! short-circuits any turn before the active step sees it.
//!
//! The pure core lives in [`dialog`]; [`runtime`] wraps it with state
//! persistence, intent recognition, and the fail-open error policy.
//!
//! ```no_run
//! use cascade::dialog::{DialogDescriptor, PromptStep, Step};
//! use cascade::registry::DialogRegistry;
//! use cascade::runtime::{DialogService, MemoryStore};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), cascade::error::RegistryError> {
//! let onboarding = DialogDescriptor::new(
//!     "onboarding",
//!     vec![
//!         Step::Prompt(PromptStep::new("name", "What's your name?")),
//!         Step::say("Nice to meet you, {name}!"),
//!     ],
//! );
//! let registry = DialogRegistry::builder().register(onboarding).build()?;
//! let service = DialogService::new(Arc::new(registry), "onboarding", MemoryStore::new());
//! # Ok(())
//! # }
//! ```

pub mod activity;
pub mod dialog;
pub mod error;
pub mod interruption;
pub mod recognizer;
pub mod registry;
pub mod runtime;

pub use activity::{Activity, ActivityKind};
pub use dialog::{
    ConversationState, DialogDescriptor, PromptStep, Step, TurnInput, TurnOutcome, TurnResult,
    TurnStatus, Validator,
};
pub use error::{DialogError, RegistryError, ServiceError};
pub use interruption::{Interruption, InterruptionPolicy};
pub use recognizer::{IntentScore, KeywordRecognizer, Recognizer};
pub use registry::DialogRegistry;
pub use runtime::{DialogService, MemoryStore, StateStore};
