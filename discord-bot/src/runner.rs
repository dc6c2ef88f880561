use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use dbot_core::{init_tracing, Bot};
use dbot_discord::{run_gateway, ConversationQueues};
use llm_client::{EnvGeminiConfig, GeneratedReply, GenerationBackend};
use tracing::{error, info, instrument};

use super::commands::FAILURE_REPLY;
use super::components::{build_bot_components, build_generator, build_handler_chain};
use super::config::BotConfig;

/// Routes panics through tracing so they reach the log file, then runs the default hook.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!(panic = %info, "Panic");
        default_hook(info);
    }));
}

/// Main entry: validate config, init logging, build components and chain, then run the gateway.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;
    install_panic_hook();

    info!(
        command_prefix = %config.command_prefix(),
        allowed_channels = config.allowed_channel_ids().len(),
        reply_chunk_size = config.reply_chunk_size(),
        "Initializing bot"
    );

    let components = build_bot_components(&config, None, None)?;
    let handler_chain = build_handler_chain(&config, &components);
    let queues = Arc::new(
        ConversationQueues::new(handler_chain, components.bot.clone())
            .with_failure_reply(FAILURE_REPLY),
    );

    info!("Bot started successfully");

    run_gateway(
        config.base().discord_config(),
        queues,
        components.bot_user.clone(),
    )
    .await
}

/// Builds components, chain and queues without connecting to Discord. Used by integration
/// tests that inject a mock bot and backend and feed core messages to the queues.
pub fn build_queues_only(
    config: &BotConfig,
    bot: Arc<dyn Bot>,
    backend: Arc<dyn GenerationBackend>,
) -> Result<ConversationQueues> {
    config.validate()?;
    let components = build_bot_components(config, Some(bot), Some(backend))?;
    let handler_chain = build_handler_chain(config, &components);
    Ok(ConversationQueues::new(handler_chain, components.bot).with_failure_reply(FAILURE_REPLY))
}

/// One-shot generation without Discord: Gemini config from env, empty history.
/// `alias` defaults to the catalog default.
#[instrument(skip(prompt))]
pub async fn ask(prompt: &str, alias: Option<String>) -> Result<GeneratedReply> {
    let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/discord-bot.log".to_string());
    init_tracing(&log_file)?;

    let gemini = EnvGeminiConfig::from_env()?;
    let generator = build_generator(&gemini, None)?;
    let alias = alias.unwrap_or_else(|| generator.catalog().default_alias().to_string());

    generator
        .generate_response(prompt, &[], &alias)
        .await
        .context("Gemini generation failed")
}
