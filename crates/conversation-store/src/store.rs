//! Store interface.

use async_trait::async_trait;

use crate::types::{Role, TranscriptEntry};

/// Conversation transcripts keyed by conversation key, model aliases keyed by user key.
///
/// Every operation is infallible. Callers that need per-key ordering (appends applied in the
/// order their events arrived) must serialize calls per conversation key themselves.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Appends a turn, creating the transcript if absent, then evicts down to the cap.
    async fn append(&self, conversation_key: &str, role: Role, content: &str);

    /// Current transcript, oldest first; empty for unknown keys.
    async fn read_transcript(&self, conversation_key: &str) -> Vec<TranscriptEntry>;

    /// Empties the transcript. Idempotent.
    async fn reset(&self, conversation_key: &str);

    /// Stores `alias` for the user, overwriting any previous value. The alias is not validated.
    async fn set_model_preference(&self, user_key: &str, alias: &str);

    /// Stored alias, or the configured default when the user never set one.
    async fn get_model_preference(&self, user_key: &str) -> String;
}
