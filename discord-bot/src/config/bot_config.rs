//! BotConfig: BaseConfig + BaseAppExtensions. Use load() for env-based loading.
//!
//! Only base config (Discord + log + replies) lives here. Memory and Gemini configs live in
//! their crates; access via `extensions().conversation_config()`, etc.

use anyhow::Result;

use super::{AppExtensions, BaseAppExtensions, BaseConfig};

/// Bot config: BaseConfig + extensions. Use BotConfig::load() for env-based loading.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub extensions: BaseAppExtensions,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides DISCORD_TOKEN.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let extensions = BaseAppExtensions::from_env()?;
        Ok(Self { base, extensions })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        let gemini = self.extensions.gemini_config();
        if gemini.api_key().trim().is_empty() {
            anyhow::bail!("GOOGLE_API_KEY is empty");
        }
        if reqwest::Url::parse(gemini.base_url()).is_err() {
            anyhow::bail!("GEMINI_BASE_URL is not a valid URL: {}", gemini.base_url());
        }
        let catalog = gemini.catalog();
        if !catalog.contains(catalog.default_alias()) {
            anyhow::bail!(
                "default model alias {} is not in the catalog",
                catalog.default_alias()
            );
        }
        Ok(())
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn extensions(&self) -> &BaseAppExtensions {
        &self.extensions
    }

    // --- Base config getters ---
    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn allowed_channel_ids(&self) -> &[String] {
        &self.base.allowed_channel_ids
    }
    pub fn reply_chunk_size(&self) -> usize {
        self.base.reply_chunk_size
    }
    pub fn command_prefix(&self) -> &str {
        self.extensions.command_prefix()
    }
}
