//! Chat identity type for core messages.

use serde::{Deserialize, Serialize};

/// Channel identity. `guild_id` is `None` for direct messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub guild_id: Option<String>,
}

impl Chat {
    /// True when the channel is a one-to-one conversation with the bot.
    pub fn is_direct(&self) -> bool {
        self.guild_id.is_none()
    }
}
