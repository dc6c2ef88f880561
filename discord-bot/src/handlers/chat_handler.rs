//! # Chat handler
//!
//! Terminal handler for chat turns: shows typing, generates a reply from the conversation
//! transcript with the author's preferred model, records it as the assistant turn, then sends
//! it back in chunks as replies. The turn is recorded before sending, so a failed chunk never
//! loses a reply the user has partly seen.

use std::sync::Arc;

use async_trait::async_trait;
use conversation_store::{ConversationStore, Role};
use dbot_core::{split_message, Bot, Handler, HandlerResponse, Message, Result};
use llm_client::TextGenerator;
use tracing::{error, info, instrument, warn};

use crate::commands::FAILURE_REPLY;

pub struct ChatHandler {
    bot: Arc<dyn Bot>,
    store: Arc<dyn ConversationStore>,
    generator: TextGenerator,
    reply_chunk_size: usize,
}

impl ChatHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        store: Arc<dyn ConversationStore>,
        generator: TextGenerator,
        reply_chunk_size: usize,
    ) -> Self {
        Self {
            bot,
            store,
            generator,
            reply_chunk_size,
        }
    }
}

#[async_trait]
impl Handler for ChatHandler {
    #[instrument(skip(self, message), fields(conversation_key = %message.conversation_key()))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let prompt = message.content.trim();
        if prompt.is_empty() {
            return Ok(HandlerResponse::Continue);
        }
        let key = message.conversation_key();

        let mut history = self.store.read_transcript(&key).await;
        // The transcript already ends with this turn; it is sent once, as the prompt.
        if history
            .last()
            .is_some_and(|e| e.role == Role::User && e.content == prompt)
        {
            history.pop();
        }
        let alias = self.store.get_model_preference(&message.user.id).await;

        if let Err(e) = self.bot.send_typing(&message.chat).await {
            warn!(error = %e, channel_id = %message.chat.id, "Failed to send typing indicator");
        }

        info!(
            user_id = %message.user.id,
            alias = %alias,
            history_len = history.len(),
            "step: ChatHandler generating reply"
        );

        match self.generator.generate_response(prompt, &history, &alias).await {
            Ok(reply) => {
                self.store.append(&key, Role::Assistant, &reply.text).await;
                let chunks = split_message(&reply.text, self.reply_chunk_size);
                for chunk in &chunks {
                    self.bot.reply_to(message, chunk).await?;
                }
                info!(
                    user_id = %message.user.id,
                    model = %reply.model,
                    chunks = chunks.len(),
                    "step: ChatHandler reply sent"
                );
                Ok(HandlerResponse::Reply(reply.text))
            }
            Err(e) => {
                error!(
                    user_id = %message.user.id,
                    error = %e,
                    safety_block = e.is_safety_block(),
                    "Chat turn failed, sending apology"
                );
                self.bot.reply_to(message, FAILURE_REPLY).await?;
                Ok(HandlerResponse::Stop)
            }
        }
    }
}
