//! Gateway runner: connects, identifies, heartbeats, converts `MESSAGE_CREATE` to core messages
//! and hands them to the per-conversation queues. Reconnects after any non-fatal disconnect.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dbot_core::ToCoreMessage;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::RwLock;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{debug, error, info, instrument, warn};

use crate::adapters::DiscordMessageWrapper;
use crate::config::DiscordConfig;
use crate::error::GatewayError;
use crate::gateway::{
    self, DiscordMessage, DiscordUser, GatewayPayload, Hello, Ready, OP_DISPATCH, OP_HEARTBEAT,
    OP_HEARTBEAT_ACK, OP_HELLO, OP_INVALID_SESSION, OP_RECONNECT,
};
use crate::queue::ConversationQueues;

/// Wait before reconnecting after a session ends.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Runs gateway sessions until a fatal close (e.g. invalid token). `bot_user` is filled from READY.
#[instrument(skip(config, queues, bot_user))]
pub async fn run_gateway(
    config: DiscordConfig,
    queues: Arc<ConversationQueues>,
    bot_user: Arc<RwLock<Option<DiscordUser>>>,
) -> Result<()> {
    loop {
        match run_session(&config, &queues, &bot_user).await {
            Err(e) if e.is_fatal() => {
                error!(error = %e, "Gateway closed with a fatal code, not reconnecting");
                return Err(e.into());
            }
            Err(e) => warn!(error = %e, "Gateway session ended, reconnecting"),
            Ok(()) => info!("Gateway session ended, reconnecting"),
        }
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

/// One connection: Hello → Identify → heartbeat/dispatch loop. Always ends with the reason.
async fn run_session(
    config: &DiscordConfig,
    queues: &ConversationQueues,
    bot_user: &RwLock<Option<DiscordUser>>,
) -> std::result::Result<(), GatewayError> {
    info!(url = %config.gateway_url, "step: connecting to gateway");
    let (socket, _) = connect_async(config.gateway_url.as_str()).await?;
    let (mut write, mut read) = socket.split();

    let hello: Hello = loop {
        match read.next().await {
            Some(Ok(WsMessage::Text(text))) => {
                let payload: GatewayPayload = serde_json::from_str(&text)?;
                if payload.op != OP_HELLO {
                    return Err(GatewayError::Protocol(format!(
                        "expected Hello, got op {}",
                        payload.op
                    )));
                }
                break payload.data()?;
            }
            Some(Ok(WsMessage::Close(frame))) => return Err(closed(frame)),
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
            None => return Err(stream_ended()),
        }
    };
    info!(heartbeat_interval_ms = hello.heartbeat_interval, "step: gateway hello");

    let identify = gateway::identify(&config.bot_token, config.activity.as_deref());
    write.send(WsMessage::Text(identify.to_string())).await?;

    let mut heartbeat = tokio::time::interval(Duration::from_millis(hello.heartbeat_interval.max(1)));
    let mut sequence: Option<u64> = None;
    let mut awaiting_ack = false;

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                if awaiting_ack {
                    return Err(GatewayError::HeartbeatTimeout);
                }
                write.send(WsMessage::Text(gateway::heartbeat(sequence).to_string())).await?;
                awaiting_ack = true;
                debug!(sequence = ?sequence, "Heartbeat sent");
            }
            frame = read.next() => {
                let text = match frame {
                    Some(Ok(WsMessage::Text(text))) => text,
                    Some(Ok(WsMessage::Close(frame))) => return Err(closed(frame)),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                    None => return Err(stream_ended()),
                };
                let payload: GatewayPayload = serde_json::from_str(&text)?;
                if payload.s.is_some() {
                    sequence = payload.s;
                }
                match payload.op {
                    OP_DISPATCH => dispatch(&payload, queues, bot_user).await,
                    OP_HEARTBEAT => {
                        write.send(WsMessage::Text(gateway::heartbeat(sequence).to_string())).await?;
                    }
                    OP_HEARTBEAT_ACK => awaiting_ack = false,
                    OP_RECONNECT => return Err(GatewayError::ReconnectRequested),
                    OP_INVALID_SESSION => return Err(GatewayError::InvalidSession),
                    op => debug!(op, "Ignoring gateway opcode"),
                }
            }
        }
    }
}

/// Handles one dispatch event. Undecodable events are logged and skipped.
async fn dispatch(
    payload: &GatewayPayload,
    queues: &ConversationQueues,
    bot_user: &RwLock<Option<DiscordUser>>,
) {
    match payload.t.as_deref() {
        Some("READY") => match payload.data::<Ready>() {
            Ok(ready) => {
                info!(
                    username = %ready.user.username,
                    user_id = %ready.user.id,
                    session_id = %ready.session_id,
                    "Logged in"
                );
                *bot_user.write().await = Some(ready.user);
            }
            Err(e) => warn!(error = %e, "Undecodable READY"),
        },
        Some("MESSAGE_CREATE") => match payload.data::<DiscordMessage>() {
            Ok(raw) => {
                let own_id = bot_user.read().await.as_ref().map(|u| u.id.clone());
                if own_id.as_deref() == Some(raw.author.id.as_str()) {
                    debug!(message_id = %raw.id, "Skipping own message");
                    return;
                }
                let message = DiscordMessageWrapper(&raw).to_core();
                info!(
                    user_id = %message.user.id,
                    chat_id = %message.chat.id,
                    message_content = %message.content,
                    "Received message"
                );
                queues.enqueue(message);
            }
            Err(e) => warn!(error = %e, "Undecodable MESSAGE_CREATE"),
        },
        Some(other) => debug!(event = %other, "Ignoring dispatch event"),
        None => debug!("Dispatch without event name"),
    }
}

fn closed(frame: Option<tokio_tungstenite::tungstenite::protocol::CloseFrame<'_>>) -> GatewayError {
    match frame {
        Some(frame) => GatewayError::Closed {
            code: Some(u16::from(frame.code)),
            reason: frame.reason.to_string(),
        },
        None => GatewayError::Closed {
            code: None,
            reason: String::new(),
        },
    }
}

fn stream_ended() -> GatewayError {
    GatewayError::Closed {
        code: None,
        reason: "stream ended".to_string(),
    }
}
