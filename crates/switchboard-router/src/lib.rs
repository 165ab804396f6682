//! # switchboard-router
//!
//! Turns a free-text chat message into at most one provider call and a reply:
//! classify the intent, pull out its parameters, call the provider, and
//! format the result.

pub mod commands;
pub mod context;
pub mod dispatcher;
pub mod extract;
pub mod format;
pub mod intent;

pub use context::ConversationStore;
pub use dispatcher::{DispatchSettings, Dispatcher};
pub use intent::{classify, Intent, IntentResult};
