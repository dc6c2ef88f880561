//! Handler implementations: logging, access filter, transcript recording, commands, chat.

mod chat_handler;
mod command_handler;
mod logging_access;
mod transcript_handler;

pub use chat_handler::ChatHandler;
pub use command_handler::CommandHandler;
pub use logging_access::{AccessHandler, LoggingHandler};
pub use transcript_handler::TranscriptHandler;
