//! # dbot-discord
//!
//! Discord framework layer: gateway runner, REST [`dbot_core::Bot`] implementation, adapters from
//! gateway payloads to core types, minimal config, and per-conversation processing queues.
//! Handles only Discord connectivity and handler-chain execution; no memory or AI logic.

mod adapters;
mod bot_adapter;
mod config;
mod error;
pub mod gateway;
mod queue;
mod runner;

pub use adapters::{DiscordMessageWrapper, DiscordUserWrapper};
pub use bot_adapter::DiscordBotAdapter;
pub use config::{DiscordConfig, DEFAULT_API_URL, DEFAULT_GATEWAY_URL};
pub use error::GatewayError;
pub use queue::ConversationQueues;
pub use runner::run_gateway;
