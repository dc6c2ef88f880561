//! Bot abstraction for sending replies.
//!
//! [`Bot`] is transport-agnostic; dbot-discord implements it over the Discord REST API and
//! tests substitute recording mocks.

use crate::error::Result;
use crate::types::{Chat, Embed, Message};
use async_trait::async_trait;

/// Abstraction for outbound messages. Implementations map to a transport (e.g. Discord).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends `text` as a reply to `message` (same chat, referencing the original message).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;

    /// Sends a rich embed as a reply to `message`.
    async fn reply_embed(&self, message: &Message, embed: &Embed) -> Result<()>;

    /// Shows the "typing..." indicator in the chat. Transports without one may no-op.
    async fn send_typing(&self, _chat: &Chat) -> Result<()> {
        Ok(())
    }
}
