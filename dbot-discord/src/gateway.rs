//! Gateway wire types: opcodes, payload envelope, the dispatch events the bot consumes,
//! and builders for the frames it sends.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const OP_DISPATCH: u8 = 0;
pub const OP_HEARTBEAT: u8 = 1;
pub const OP_IDENTIFY: u8 = 2;
pub const OP_RECONNECT: u8 = 7;
pub const OP_INVALID_SESSION: u8 = 9;
pub const OP_HELLO: u8 = 10;
pub const OP_HEARTBEAT_ACK: u8 = 11;

const INTENT_GUILDS: u64 = 1 << 0;
const INTENT_GUILD_MESSAGES: u64 = 1 << 9;
const INTENT_DIRECT_MESSAGES: u64 = 1 << 12;
const INTENT_MESSAGE_CONTENT: u64 = 1 << 15;

/// Guilds, guild messages, direct messages and message content.
pub const INTENTS: u64 =
    INTENT_GUILDS | INTENT_GUILD_MESSAGES | INTENT_DIRECT_MESSAGES | INTENT_MESSAGE_CONTENT;

/// Envelope of every gateway frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPayload {
    pub op: u8,
    #[serde(default)]
    pub d: Option<Value>,
    #[serde(default)]
    pub s: Option<u64>,
    #[serde(default)]
    pub t: Option<String>,
}

impl GatewayPayload {
    /// Decodes the `d` field as `T`.
    pub fn data<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.d.clone().unwrap_or(Value::Null))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hello {
    pub heartbeat_interval: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ready {
    pub user: DiscordUser,
    pub session_id: String,
}

/// `MESSAGE_CREATE` payload (fields the bot reads).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordMessage {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    pub author: DiscordUser,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Identify frame with intents and an online "Playing <activity>" presence.
pub fn identify(token: &str, activity: Option<&str>) -> Value {
    let activities: Vec<Value> = activity
        .map(|name| vec![json!({ "name": name, "type": 0 })])
        .unwrap_or_default();
    json!({
        "op": OP_IDENTIFY,
        "d": {
            "token": token,
            "intents": INTENTS,
            "properties": {
                "os": std::env::consts::OS,
                "browser": "dbot-discord",
                "device": "dbot-discord"
            },
            "presence": {
                "since": null,
                "activities": activities,
                "status": "online",
                "afk": false
            }
        }
    })
}

/// Heartbeat frame carrying the last sequence number seen (or null).
pub fn heartbeat(sequence: Option<u64>) -> Value {
    json!({ "op": OP_HEARTBEAT, "d": sequence })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_cover_guild_and_direct_message_content() {
        assert_eq!(INTENTS, 37377);
    }

    #[test]
    fn hello_payload_is_decoded() {
        let payload: GatewayPayload =
            serde_json::from_str(r#"{"op":10,"d":{"heartbeat_interval":41250},"s":null,"t":null}"#)
                .unwrap();
        assert_eq!(payload.op, OP_HELLO);
        assert_eq!(payload.data::<Hello>().unwrap().heartbeat_interval, 41250);
    }

    #[test]
    fn message_create_dispatch_is_decoded() {
        let raw = r#"{
            "op": 0, "s": 3, "t": "MESSAGE_CREATE",
            "d": {
                "id": "1001", "channel_id": "55", "guild_id": "7",
                "author": {"id": "42", "username": "ana", "global_name": "Ana"},
                "content": "oi miku", "timestamp": "2025-01-01T00:00:00+00:00",
                "tts": false, "mentions": []
            }
        }"#;
        let payload: GatewayPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.t.as_deref(), Some("MESSAGE_CREATE"));
        assert_eq!(payload.s, Some(3));

        let message: DiscordMessage = payload.data().unwrap();
        assert_eq!(message.channel_id, "55");
        assert_eq!(message.guild_id.as_deref(), Some("7"));
        assert_eq!(message.author.bot, None);
        assert_eq!(message.content, "oi miku");
    }

    #[test]
    fn identify_carries_token_intents_and_presence() {
        let frame = identify("tok", Some("Minecraft (Fake)"));
        assert_eq!(frame["op"], 2);
        assert_eq!(frame["d"]["token"], "tok");
        assert_eq!(frame["d"]["intents"], 37377);
        assert_eq!(frame["d"]["presence"]["status"], "online");
        assert_eq!(frame["d"]["presence"]["activities"][0]["name"], "Minecraft (Fake)");
        assert_eq!(frame["d"]["presence"]["activities"][0]["type"], 0);

        let quiet = identify("tok", None);
        assert!(quiet["d"]["presence"]["activities"].as_array().unwrap().is_empty());
    }

    #[test]
    fn heartbeat_carries_sequence_or_null() {
        assert_eq!(heartbeat(Some(9))["d"], 9);
        assert!(heartbeat(None)["d"].is_null());
    }
}
