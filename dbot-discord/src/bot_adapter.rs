//! Implements [`dbot_core::Bot`] over the Discord REST API. Production code sends through Discord;
//! tests can substitute another Bot impl or point `api_url` at a mock server.

use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, Chat, DbotError, Embed, Message, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::DiscordConfig;

/// Embed as Discord expects it (`footer` is an object).
#[derive(Debug, Serialize)]
struct EmbedBody<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    color: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<Value>,
}

impl<'a> From<&'a Embed> for EmbedBody<'a> {
    fn from(embed: &'a Embed) -> Self {
        Self {
            title: &embed.title,
            description: embed.description.as_deref(),
            color: embed.color,
            fields: embed
                .fields
                .iter()
                .map(|f| json!({ "name": f.name, "value": f.value, "inline": f.inline }))
                .collect(),
            footer: embed.footer.as_ref().map(|text| json!({ "text": text })),
        }
    }
}

/// Reqwest client authenticated with `Bot <token>`.
#[derive(Clone)]
pub struct DiscordBotAdapter {
    client: reqwest::Client,
    api_url: String,
    bot_token: String,
}

impl DiscordBotAdapter {
    pub fn new(config: &DiscordConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
        }
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<()> {
        let url = format!("{}{}", self.api_url, path);
        let mut request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bot {}", self.bot_token));
        request = match body {
            Some(body) => request.json(&body),
            None => request.header("Content-Length", "0"),
        };
        let response = request
            .send()
            .await
            .map_err(|e| DbotError::Transport(format!("Failed to reach Discord: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DbotError::Bot(format!("Discord API error {}: {}", status, body)));
        }
        debug!(path = %path, "Discord API call succeeded");
        Ok(())
    }

    fn reference(message: &Message) -> Value {
        json!({
            "message_id": message.id,
            "channel_id": message.chat.id,
            "fail_if_not_exists": false
        })
    }
}

#[async_trait]
impl CoreBot for DiscordBotAdapter {
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.post(
            &format!("/channels/{}/messages", message.chat.id),
            Some(json!({
                "content": text,
                "message_reference": Self::reference(message)
            })),
        )
        .await
    }

    async fn reply_embed(&self, message: &Message, embed: &Embed) -> Result<()> {
        self.post(
            &format!("/channels/{}/messages", message.chat.id),
            Some(json!({
                "embeds": [EmbedBody::from(embed)],
                "message_reference": Self::reference(message)
            })),
        )
        .await
    }

    async fn send_typing(&self, chat: &Chat) -> Result<()> {
        self.post(&format!("/channels/{}/typing", chat.id), None).await
    }
}
