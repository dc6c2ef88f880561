//! Core types: user, chat, message, embed, handler response, and Handler trait.
//!
//! Types are split into one file per main type.

mod chat;
mod embed;
mod handler;
mod message;
mod response;
mod user;

pub use chat::Chat;
pub use embed::{Embed, EmbedField};
pub use handler::{Handler, ToCoreMessage, ToCoreUser};
pub use message::Message;
pub use response::HandlerResponse;
pub use user::User;
