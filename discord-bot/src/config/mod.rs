//! Bot configuration: BaseConfig (Discord + log + reply shaping) + AppExtensions (commands, memory, Gemini).

mod base;
mod bot_config;
mod extensions;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use extensions::{AppExtensions, BaseAppExtensions, DEFAULT_COMMAND_PREFIX};
