//! App extensions trait and default implementation (command prefix, conversation memory, Gemini).
//! Memory and Gemini configs live in their own crates; this only aggregates them.

use anyhow::Result;
use conversation_store::{ConversationConfig, EnvConversationConfig};
use llm_client::{EnvGeminiConfig, GeminiConfig};
use std::env;

pub const DEFAULT_COMMAND_PREFIX: &str = "!miku";

/// Application extension config. Implement this trait to inject custom config.
pub trait AppExtensions: Send + Sync {
    fn conversation_config(&self) -> &dyn ConversationConfig;
    fn gemini_config(&self) -> &dyn GeminiConfig;
    /// Prefix that turns a message into a bot command. Default `!miku`.
    fn command_prefix(&self) -> &str {
        DEFAULT_COMMAND_PREFIX
    }
}

/// Base extensions: command prefix + conversation memory + Gemini. Used by the discord-bot binary.
#[derive(Debug, Clone)]
pub struct BaseAppExtensions {
    pub command_prefix: String,
    pub conversation: EnvConversationConfig,
    pub gemini: EnvGeminiConfig,
}

impl AppExtensions for BaseAppExtensions {
    fn conversation_config(&self) -> &dyn ConversationConfig {
        &self.conversation
    }
    fn gemini_config(&self) -> &dyn GeminiConfig {
        &self.gemini
    }
    fn command_prefix(&self) -> &str {
        &self.command_prefix
    }
}

impl BaseAppExtensions {
    /// Load from environment variables (COMMAND_PREFIX + memory + Gemini).
    pub fn from_env() -> Result<Self> {
        let command_prefix = env::var("COMMAND_PREFIX")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string());
        let conversation = EnvConversationConfig::from_env()?;
        let gemini = EnvGeminiConfig::from_env()?;
        Ok(Self {
            command_prefix,
            conversation,
            gemini,
        })
    }
}
