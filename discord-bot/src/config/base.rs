//! Base config: Discord connection, logging, channel restriction, reply chunking. Loaded from env.

use anyhow::{Context, Result};
use dbot_discord::{DiscordConfig, DEFAULT_API_URL, DEFAULT_GATEWAY_URL};
use std::env;

/// Discord's hard limit for one message body.
const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Base config: Discord-related, logging, reply shaping only.
#[derive(Clone)]
pub struct BaseConfig {
    /// DISCORD_TOKEN or TOKEN
    pub bot_token: String,
    /// DISCORD_API_URL
    pub discord_api_url: String,
    /// DISCORD_GATEWAY_URL
    pub discord_gateway_url: String,
    /// Log file path
    pub log_file: String,
    /// Guild channels the bot answers in; empty means every channel. DMs are always answered.
    pub allowed_channel_ids: Vec<String>,
    /// Max characters per outbound reply segment
    pub reply_chunk_size: usize,
    /// Presence text ("Playing ...")
    pub activity: Option<String>,
}

impl std::fmt::Debug for BaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseConfig")
            .field("bot_token", &gemini_client::mask_token(&self.bot_token))
            .field("discord_api_url", &self.discord_api_url)
            .field("discord_gateway_url", &self.discord_gateway_url)
            .field("log_file", &self.log_file)
            .field("allowed_channel_ids", &self.allowed_channel_ids)
            .field("reply_chunk_size", &self.reply_chunk_size)
            .field("activity", &self.activity)
            .finish()
    }
}

/// Comma/whitespace separated ids from ALLOWED_CHANNEL_IDS, plus the single-id ID_CANAL / ID_CANAL1.
fn allowed_channels_from_env() -> Vec<String> {
    let mut ids: Vec<String> = env::var("ALLOWED_CHANNEL_IDS")
        .unwrap_or_default()
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    for var in ["ID_CANAL", "ID_CANAL1"] {
        if let Ok(id) = env::var(var) {
            let id = id.trim();
            if !id.is_empty() && !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }
    }
    ids
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides DISCORD_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("DISCORD_TOKEN")
                .or_else(|_| env::var("TOKEN"))
                .context("DISCORD_TOKEN (or TOKEN) not set")?,
        };
        let discord_api_url =
            env::var("DISCORD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let discord_gateway_url =
            env::var("DISCORD_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string());
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/discord-bot.log".to_string());
        let reply_chunk_size = match env::var("REPLY_CHUNK_SIZE") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("REPLY_CHUNK_SIZE is not a number: {raw}"))?,
            Err(_) => 1900,
        };
        let activity = match env::var("BOT_ACTIVITY") {
            Ok(s) if s.trim().is_empty() => None,
            Ok(s) => Some(s),
            Err(_) => Some("Minecraft (Fake)".to_string()),
        };

        Ok(Self {
            bot_token,
            discord_api_url,
            discord_gateway_url,
            log_file,
            allowed_channel_ids: allowed_channels_from_env(),
            reply_chunk_size,
            activity,
        })
    }

    /// Validate config (URLs parse, token present, chunk size fits one Discord message).
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("DISCORD_TOKEN is empty");
        }
        if reqwest::Url::parse(&self.discord_api_url).is_err() {
            anyhow::bail!("DISCORD_API_URL is not a valid URL: {}", self.discord_api_url);
        }
        if reqwest::Url::parse(&self.discord_gateway_url).is_err() {
            anyhow::bail!(
                "DISCORD_GATEWAY_URL is not a valid URL: {}",
                self.discord_gateway_url
            );
        }
        if self.reply_chunk_size == 0 || self.reply_chunk_size > DISCORD_MESSAGE_LIMIT {
            anyhow::bail!(
                "REPLY_CHUNK_SIZE must be between 1 and {}, got {}",
                DISCORD_MESSAGE_LIMIT,
                self.reply_chunk_size
            );
        }
        Ok(())
    }

    /// Connectivity settings for the gateway runner and REST adapter.
    pub fn discord_config(&self) -> DiscordConfig {
        let mut config = DiscordConfig::with_token(self.bot_token.clone());
        config.api_url = self.discord_api_url.clone();
        config.gateway_url = self.discord_gateway_url.clone();
        config.activity = self.activity.clone();
        config
    }
}
