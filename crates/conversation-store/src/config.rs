//! Store configuration: trait and env-based implementation.

use anyhow::{bail, Context, Result};
use std::env;

/// Exchanges kept per conversation when `MEMORY_MAX_TURNS` is unset.
pub const DEFAULT_MAX_TURNS: usize = 20;

/// Conversation store configuration interface.
pub trait ConversationConfig: Send + Sync {
    /// Maximum user/assistant exchanges retained per conversation.
    fn max_turns(&self) -> usize;
}

/// Store config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvConversationConfig {
    pub memory_max_turns: usize,
}

impl Default for EnvConversationConfig {
    fn default() -> Self {
        Self {
            memory_max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl ConversationConfig for EnvConversationConfig {
    fn max_turns(&self) -> usize {
        self.memory_max_turns
    }
}

impl EnvConversationConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let memory_max_turns = match env::var("MEMORY_MAX_TURNS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("MEMORY_MAX_TURNS is not a number: {raw}"))?,
            Err(_) => DEFAULT_MAX_TURNS,
        };
        if memory_max_turns == 0 {
            bail!("MEMORY_MAX_TURNS must be at least 1");
        }
        Ok(Self { memory_max_turns })
    }
}
