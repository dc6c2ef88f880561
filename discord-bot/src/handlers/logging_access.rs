//! Handlers for logging and channel access (bots filtered out, optional channel allowlist).

use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, Result};
use tracing::{debug, info, instrument};

/// Logs each message in before() and the response in after(); always continues.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        info!(
            user_id = %message.user.id,
            username = %message.user.username,
            conversation_key = %message.conversation_key(),
            message_content = %message.content,
            "Processing message"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        debug!(
            message_id = %message.id,
            response = ?response,
            "Processed message"
        );
        Ok(())
    }
}

/// Stops the chain for bot authors and, when an allowlist is set, for guild channels outside it.
/// Direct messages from people are always let through.
pub struct AccessHandler {
    allowed_channel_ids: Vec<String>,
}

impl AccessHandler {
    /// An empty list allows every channel.
    pub fn new(allowed_channel_ids: Vec<String>) -> Self {
        Self {
            allowed_channel_ids,
        }
    }
}

#[async_trait]
impl Handler for AccessHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        if message.user.is_bot {
            debug!(user_id = %message.user.id, "Ignoring message from a bot");
            return Ok(false);
        }
        if message.chat.is_direct() || self.allowed_channel_ids.is_empty() {
            return Ok(true);
        }
        if self.allowed_channel_ids.contains(&message.chat.id) {
            Ok(true)
        } else {
            info!(channel_id = %message.chat.id, "Ignoring message outside allowed channels");
            Ok(false)
        }
    }
}
