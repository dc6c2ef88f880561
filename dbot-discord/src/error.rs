//! Gateway session errors.

use thiserror::Error;

/// Why a gateway session ended.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Gateway closed (code {code:?}): {reason}")]
    Closed { code: Option<u16>, reason: String },

    #[error("Gateway protocol error: {0}")]
    Protocol(String),

    #[error("Gateway requested reconnect")]
    ReconnectRequested,

    #[error("Gateway invalidated the session")]
    InvalidSession,

    #[error("No heartbeat ACK received")]
    HeartbeatTimeout,
}

impl GatewayError {
    /// Close codes Discord uses for errors a reconnect cannot fix (bad token, intents, version).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GatewayError::Closed {
                code: Some(4004 | 4010 | 4011 | 4012 | 4013 | 4014),
                ..
            }
        )
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for GatewayError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        GatewayError::WebSocket(e.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Protocol(e.to_string())
    }
}
