//! Conversation history management for Yak: bounded sessions with
//! threshold-triggered summarization and whole-record disk persistence.

pub mod compact;
pub mod error;
pub mod store;
pub mod turn;
pub mod types;

pub use compact::{CompactionResult, DEFAULT_KEEP_RECENT, compact};
pub use error::SessionError;
pub use store::HistoryStore;
pub use turn::exchange;
pub use types::{DEFAULT_SYSTEM_PROMPT, Session};
