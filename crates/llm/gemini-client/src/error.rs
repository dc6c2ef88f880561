//! Gemini client errors.

use thiserror::Error;

/// Failure talking to the Gemini API.
#[derive(Error, Debug)]
pub enum GeminiError {
    /// The request did not complete within the configured timeout.
    #[error("Gemini request timed out")]
    Timeout,

    #[error("Gemini transport error: {0}")]
    Transport(String),

    #[error("Gemini API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode Gemini response: {0}")]
    Decode(String),
}

impl GeminiError {
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GeminiError::Timeout
        } else {
            GeminiError::Transport(e.to_string())
        }
    }
}
