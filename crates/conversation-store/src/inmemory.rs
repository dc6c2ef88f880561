//! In-memory [`ConversationStore`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::ConversationConfig;
use crate::store::ConversationStore;
use crate::types::{Role, TranscriptEntry};

/// Process-memory store. Clones share the same maps.
#[derive(Debug, Clone)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<String, Vec<TranscriptEntry>>>>,
    preferences: Arc<RwLock<HashMap<String, String>>>,
    max_turns: usize,
    default_alias: String,
}

impl InMemoryConversationStore {
    /// Creates an empty store keeping at most `max_turns` exchanges per conversation.
    /// `max_turns` of 0 is treated as 1.
    pub fn new(max_turns: usize, default_alias: impl Into<String>) -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
            preferences: Arc::new(RwLock::new(HashMap::new())),
            max_turns: max_turns.max(1),
            default_alias: default_alias.into(),
        }
    }

    pub fn from_config(config: &dyn ConversationConfig, default_alias: impl Into<String>) -> Self {
        Self::new(config.max_turns(), default_alias)
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn default_alias(&self) -> &str {
        &self.default_alias
    }

    /// Number of conversations with a transcript (including reset ones).
    pub async fn conversation_count(&self) -> usize {
        self.conversations.read().await.len()
    }

    fn capacity(&self) -> usize {
        self.max_turns * 2
    }
}

/// Drops entries from the front until `entries` fits `cap`, then drops leading assistant turns.
///
/// A transcript must never start with an assistant turn, so a retained tail made only of
/// assistant turns is dropped entirely and the transcript ends up empty.
fn evict(entries: &mut Vec<TranscriptEntry>, cap: usize) -> usize {
    if entries.len() <= cap {
        return 0;
    }
    let mut drop = entries.len() - cap;
    while drop < entries.len() && entries[drop].role == Role::Assistant {
        drop += 1;
    }
    entries.drain(..drop);
    drop
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, conversation_key: &str, role: Role, content: &str) {
        let mut conversations = self.conversations.write().await;
        let entries = conversations.entry(conversation_key.to_string()).or_default();
        entries.push(TranscriptEntry::new(role, content));
        let evicted = evict(entries, self.capacity());
        if evicted > 0 {
            debug!(
                conversation_key = %conversation_key,
                evicted,
                retained = entries.len(),
                "Evicted oldest transcript entries"
            );
        }
    }

    async fn read_transcript(&self, conversation_key: &str) -> Vec<TranscriptEntry> {
        self.conversations
            .read()
            .await
            .get(conversation_key)
            .cloned()
            .unwrap_or_default()
    }

    async fn reset(&self, conversation_key: &str) {
        self.conversations
            .write()
            .await
            .insert(conversation_key.to_string(), Vec::new());
    }

    async fn set_model_preference(&self, user_key: &str, alias: &str) {
        self.preferences
            .write()
            .await
            .insert(user_key.to_string(), alias.to_string());
    }

    async fn get_model_preference(&self, user_key: &str) -> String {
        self.preferences
            .read()
            .await
            .get(user_key)
            .cloned()
            .unwrap_or_else(|| self.default_alias.clone())
    }
}
