//! Minimal framework config: token, REST and gateway URLs, presence text.
//! The application fills it from its own env config.

pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";
pub const DEFAULT_GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";

/// Discord connectivity config.
#[derive(Clone)]
pub struct DiscordConfig {
    pub bot_token: String,
    pub api_url: String,
    pub gateway_url: String,
    /// Shown as "Playing <activity>"; `None` sends no activity.
    pub activity: Option<String>,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &"***")
            .field("api_url", &self.api_url)
            .field("gateway_url", &self.gateway_url)
            .field("activity", &self.activity)
            .finish()
    }
}

impl DiscordConfig {
    /// Builds a config for `bot_token` with default URLs and no activity.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            api_url: DEFAULT_API_URL.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            activity: None,
        }
    }
}
