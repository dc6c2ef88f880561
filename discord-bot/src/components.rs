//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use std::sync::Arc;

use anyhow::{Context, Result};
use conversation_store::{ConversationStore, InMemoryConversationStore};
use dbot_core::Bot;
use dbot_discord::gateway::DiscordUser;
use dbot_discord::DiscordBotAdapter;
use gemini_client::GeminiClient;
use handler_chain::HandlerChain;
use llm_client::{GeminiConfig, GenerationBackend, TextGenerator};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::config::{AppExtensions, BotConfig};
use crate::handlers::{AccessHandler, ChatHandler, CommandHandler, LoggingHandler, TranscriptHandler};

/// Core dependencies for run_bot; produced by the component factory.
#[derive(Clone)]
pub struct BotComponents {
    /// Outbound Discord REST (or a test double).
    pub bot: Arc<dyn Bot>,
    pub store: Arc<dyn ConversationStore>,
    pub generator: TextGenerator,
    /// Filled by the gateway runner on READY.
    pub bot_user: Arc<RwLock<Option<DiscordUser>>>,
}

/// Builds the text generator over a real [`GeminiClient`], or over `backend_override` when given.
pub fn build_generator(
    config: &dyn GeminiConfig,
    backend_override: Option<Arc<dyn GenerationBackend>>,
) -> Result<TextGenerator> {
    let backend: Arc<dyn GenerationBackend> = match backend_override {
        Some(backend) => backend,
        None => Arc::new(
            GeminiClient::new(config.api_key(), config.base_url(), config.timeout())
                .context("Failed to build Gemini HTTP client")?,
        ),
    };
    Ok(TextGenerator::from_config(backend, config))
}

/// Builds BotComponents. Overrides replace the Discord REST adapter and the Gemini backend (tests).
#[instrument(skip(config, bot_override, backend_override))]
pub fn build_bot_components(
    config: &BotConfig,
    bot_override: Option<Arc<dyn Bot>>,
    backend_override: Option<Arc<dyn GenerationBackend>>,
) -> Result<BotComponents> {
    let bot: Arc<dyn Bot> = match bot_override {
        Some(bot) => bot,
        None => Arc::new(DiscordBotAdapter::new(&config.base().discord_config())),
    };

    let gemini = config.extensions().gemini_config();
    let generator = build_generator(gemini, backend_override)?;
    let default_alias = generator.catalog().default_alias().to_string();

    let store: Arc<dyn ConversationStore> = Arc::new(InMemoryConversationStore::from_config(
        config.extensions().conversation_config(),
        default_alias.as_str(),
    ));
    info!(
        max_turns = config.extensions().conversation_config().max_turns(),
        default_alias = %default_alias,
        default_model = %generator.catalog().default_model(),
        "Using in-memory conversation store"
    );

    Ok(BotComponents {
        bot,
        store,
        generator,
        bot_user: Arc::new(RwLock::new(None)),
    })
}

/// Builds the handler chain (logging → access → transcript → commands → chat).
pub fn build_handler_chain(config: &BotConfig, components: &BotComponents) -> HandlerChain {
    let prefix = config.command_prefix();
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(AccessHandler::new(
            config.allowed_channel_ids().to_vec(),
        )))
        .add_handler(Arc::new(TranscriptHandler::new(
            components.store.clone(),
            prefix,
        )))
        .add_handler(Arc::new(CommandHandler::new(
            components.bot.clone(),
            components.store.clone(),
            components.generator.catalog().clone(),
            prefix,
        )))
        .add_handler(Arc::new(ChatHandler::new(
            components.bot.clone(),
            components.store.clone(),
            components.generator.clone(),
            config.reply_chunk_size(),
        )))
}
