//! # dbot-core
//!
//! Core types and traits for the chat relay: [`Bot`], [`Handler`], message and user types,
//! reply chunking and tracing initialization. Transport-agnostic; used by dbot-discord,
//! handler-chain and the discord-bot application.

pub mod bot;
pub mod error;
pub mod logger;
pub mod text;
pub mod types;

pub use bot::Bot;
pub use error::{DbotError, Result};
pub use logger::init_tracing;
pub use text::split_message;
pub use types::{
    Chat, Embed, EmbedField, Handler, HandlerResponse, Message, ToCoreMessage, ToCoreUser, User,
};
