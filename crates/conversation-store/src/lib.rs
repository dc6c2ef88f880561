//! # Conversation store
//!
//! Keeps one bounded transcript per conversation key and one preferred model alias per user.
//! State lives in process memory only; construct one [`InMemoryConversationStore`] at startup
//! and share it (it is cheap to clone).
//!
//! Eviction is FIFO by entry: once a transcript grows past `2 * max_turns` the oldest entries
//! are dropped, then any assistant entries left at the front, so a transcript always opens on
//! a user turn. With strictly paired appends this removes exactly the oldest user/assistant
//! exchange.

mod config;
mod inmemory;
mod store;
mod types;

pub use config::{ConversationConfig, EnvConversationConfig, DEFAULT_MAX_TURNS};
pub use inmemory::InMemoryConversationStore;
pub use store::ConversationStore;
pub use types::{Role, TranscriptEntry};
