//! Turn runtime: drives the pure dialog core against a state store
//!
//! The engine processes one inbound activity at a time per conversation,
//! cooperatively suspending at turn boundaries. Nothing here blocks between
//! turns; a "waiting" conversation is just persisted state until the host
//! delivers the next activity.

mod service;
pub mod store;

#[cfg(test)]
pub mod testing;

pub use service::DialogService;
pub use store::{MemoryStore, StateStore};
