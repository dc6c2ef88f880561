//! Inbound message type for the core model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{chat::Chat, user::User};

/// A single inbound message with author, channel and text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Key of the conversation this message belongs to.
    ///
    /// Direct messages are keyed per author (`dm_<user id>`); channel messages share one
    /// conversation per channel id, so everyone in a channel talks to the same history.
    pub fn conversation_key(&self) -> String {
        if self.chat.is_direct() {
            format!("dm_{}", self.user.id)
        } else {
            self.chat.id.clone()
        }
    }
}
