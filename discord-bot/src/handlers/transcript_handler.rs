//! # Transcript handler
//!
//! Records the user side of chat turns in the conversation store from before(), so the turn
//! is kept even when generation fails. The assistant side is recorded by
//! [`super::ChatHandler`]. Commands and ignored text are never recorded.

use std::sync::Arc;

use async_trait::async_trait;
use conversation_store::{ConversationStore, Role};
use dbot_core::{Handler, Message, Result};
use tracing::{info, instrument};

use crate::commands::{classify, Inbound};

pub struct TranscriptHandler {
    store: Arc<dyn ConversationStore>,
    command_prefix: String,
}

impl TranscriptHandler {
    pub fn new(store: Arc<dyn ConversationStore>, command_prefix: impl Into<String>) -> Self {
        Self {
            store,
            command_prefix: command_prefix.into(),
        }
    }
}

#[async_trait]
impl Handler for TranscriptHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        if let Inbound::Chat(text) = classify(&message.content, &self.command_prefix) {
            let key = message.conversation_key();
            self.store.append(&key, Role::User, &text).await;
            info!(
                user_id = %message.user.id,
                conversation_key = %key,
                "step: TranscriptHandler before done, user turn recorded"
            );
        }
        Ok(true)
    }
}
