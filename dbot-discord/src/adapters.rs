//! Adapters from Discord gateway types to dbot_core types.

use chrono::{DateTime, Utc};
use dbot_core::{Chat, Message, ToCoreMessage, ToCoreUser, User};

use crate::gateway::{DiscordMessage, DiscordUser};

/// Wraps a gateway user for conversion to core [`User`].
pub struct DiscordUserWrapper<'a>(pub &'a DiscordUser);

impl<'a> ToCoreUser for DiscordUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.clone(),
            username: self.0.username.clone(),
            display_name: self.0.global_name.clone(),
            is_bot: self.0.bot.unwrap_or(false),
        }
    }
}

/// Wraps a `MESSAGE_CREATE` payload for conversion to core [`Message`].
pub struct DiscordMessageWrapper<'a>(pub &'a DiscordMessage);

impl<'a> ToCoreMessage for DiscordMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.clone(),
            user: DiscordUserWrapper(&self.0.author).to_core(),
            chat: Chat {
                id: self.0.channel_id.clone(),
                guild_id: self.0.guild_id.clone(),
            },
            content: self.0.content.clone(),
            created_at: self.created_at(),
        }
    }
}

impl<'a> DiscordMessageWrapper<'a> {
    /// Message timestamp, or now when absent or unparsable.
    fn created_at(&self) -> DateTime<Utc> {
        self.0
            .timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or_else(Utc::now)
    }
}
