//! Error type for the bot core.

use thiserror::Error;

/// Top-level error for dbot: outbound platform calls rejected or never delivered.
#[derive(Error, Debug)]
pub enum DbotError {
    /// The platform answered with an error.
    #[error("Bot error: {0}")]
    Bot(String),

    /// The platform could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type for core operations; uses [`DbotError`].
pub type Result<T> = std::result::Result<T, DbotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_with_their_kind() {
        assert_eq!(
            DbotError::Bot("Discord API error 403".to_string()).to_string(),
            "Bot error: Discord API error 403"
        );
        assert_eq!(
            DbotError::Transport("timeout".to_string()).to_string(),
            "Transport error: timeout"
        );
    }
}
