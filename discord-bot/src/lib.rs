//! # Discord bot application
//!
//! Wires handler-chain, the conversation store, the Gemini generator and the Discord gateway.
//! Loads config from env, builds the handler chain and runs the gateway with per-conversation
//! queues.

pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod handlers;
pub mod runner;

pub use cli::{load_config, Cli, Commands};
pub use commands::{classify, Command, Inbound, FAILURE_REPLY};
pub use components::{build_bot_components, build_generator, build_handler_chain, BotComponents};
pub use config::{AppExtensions, BaseAppExtensions, BaseConfig, BotConfig};
pub use handlers::{AccessHandler, ChatHandler, CommandHandler, LoggingHandler, TranscriptHandler};
pub use runner::{ask, build_queues_only, run_bot};
