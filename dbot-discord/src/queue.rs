//! Per-conversation serial processing.
//!
//! Every message is queued under its conversation key; one worker task per key runs the handler
//! chain for its messages one at a time, in arrival order. Different conversations run
//! concurrently. A chain error or panic is logged and answered with the failure reply; the
//! worker keeps going. A worker idle for `idle_timeout` with nothing queued removes its entry
//! and exits; the next message for that conversation spawns a fresh one.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dbot_core::{Bot, HandlerResponse, Message};
use handler_chain::HandlerChain;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

type QueueSender = mpsc::UnboundedSender<Message>;
type QueueMap = Arc<DashMap<String, QueueSender>>;

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Routes messages to per-conversation workers that run the handler chain.
pub struct ConversationQueues {
    chain: HandlerChain,
    bot: Arc<dyn Bot>,
    failure_reply: Option<String>,
    idle_timeout: Duration,
    queues: QueueMap,
}

impl ConversationQueues {
    pub fn new(chain: HandlerChain, bot: Arc<dyn Bot>) -> Self {
        Self {
            chain,
            bot,
            failure_reply: None,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            queues: Arc::new(DashMap::new()),
        }
    }

    /// How long a worker waits for its next message before retiring.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Text sent (as a reply) when processing a message fails unexpectedly.
    pub fn with_failure_reply(mut self, text: impl Into<String>) -> Self {
        self.failure_reply = Some(text.into());
        self
    }

    /// Number of conversations with a live worker.
    pub fn active_conversations(&self) -> usize {
        self.queues.len()
    }

    /// Queues `message` behind earlier messages of the same conversation. Returns immediately.
    #[instrument(skip(self, message), fields(message_id = %message.id))]
    pub fn enqueue(&self, message: Message) {
        let key = message.conversation_key();
        let mut message = Some(message);
        for _ in 0..2 {
            let Some(m) = message.take() else { return };
            // Sent under the entry lock: an idle worker can only retire between sends.
            let sent = self
                .queues
                .entry(key.clone())
                .or_insert_with(|| self.spawn_worker(key.clone()))
                .send(m);
            match sent {
                Ok(()) => return,
                Err(mpsc::error::SendError(m)) => {
                    warn!(conversation_key = %key, "Conversation worker gone, respawning");
                    self.queues.remove_if(&key, |_, tx| tx.is_closed());
                    message = Some(m);
                }
            }
        }
        error!(conversation_key = %key, "Failed to queue message");
    }

    fn spawn_worker(&self, key: String) -> QueueSender {
        let (tx, rx) = mpsc::unbounded_channel::<Message>();
        tokio::spawn(Self::process_queue_loop(
            rx,
            self.chain.clone(),
            self.bot.clone(),
            self.failure_reply.clone(),
            self.queues.clone(),
            self.idle_timeout,
            key,
        ));
        tx
    }

    /// Consumes one conversation's queue, running the chain for each message in order.
    async fn process_queue_loop(
        mut rx: mpsc::UnboundedReceiver<Message>,
        chain: HandlerChain,
        bot: Arc<dyn Bot>,
        failure_reply: Option<String>,
        queues: QueueMap,
        idle_timeout: Duration,
        conversation_key: String,
    ) {
        loop {
            let message = match tokio::time::timeout(idle_timeout, rx.recv()).await {
                Ok(Some(message)) => message,
                Ok(None) => break,
                Err(_) => {
                    if queues
                        .remove_if(&conversation_key, |_, _| rx.is_empty())
                        .is_some()
                    {
                        debug!(conversation_key = %conversation_key, "Conversation idle, worker retired");
                        break;
                    }
                    continue;
                }
            };
            info!(
                user_id = %message.user.id,
                conversation_key = %conversation_key,
                "Processing queued message"
            );
            let chain = chain.clone();
            let task_message = message.clone();
            // Spawned so a panic inside a handler is contained to this message.
            let outcome = tokio::spawn(async move { chain.handle(&task_message).await }).await;

            let failure = match outcome {
                Ok(Ok(response)) => {
                    if let HandlerResponse::Reply(text) = &response {
                        info!(conversation_key = %conversation_key, reply_len = text.chars().count(), "Message answered");
                    }
                    None
                }
                Ok(Err(e)) => Some(e.to_string()),
                Err(join_error) => Some(format!("handler task panicked: {}", join_error)),
            };

            if let Some(reason) = failure {
                error!(
                    error = %reason,
                    user_id = %message.user.id,
                    conversation_key = %conversation_key,
                    "Failed to process queued message"
                );
                if let Some(text) = &failure_reply {
                    if let Err(e) = bot.reply_to(&message, text).await {
                        error!(error = %e, "Failed to send failure reply");
                    }
                }
            }
        }
    }
}
