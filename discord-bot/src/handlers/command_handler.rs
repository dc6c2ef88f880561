//! Executes `!miku` commands and swallows other bots' commands. Chat turns pass through.

use std::sync::Arc;

use async_trait::async_trait;
use conversation_store::ConversationStore;
use dbot_core::{Bot, Handler, HandlerResponse, Message, Result};
use llm_client::ModelCatalog;
use tracing::{info, instrument};

use crate::commands::{
    classify, help_embed, invalid_model_reply, model_changed_reply, models_embed, Command,
    Inbound, HISTORY_CLEARED_REPLY,
};

pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    store: Arc<dyn ConversationStore>,
    catalog: ModelCatalog,
    command_prefix: String,
}

impl CommandHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        store: Arc<dyn ConversationStore>,
        catalog: ModelCatalog,
        command_prefix: impl Into<String>,
    ) -> Self {
        Self {
            bot,
            store,
            catalog,
            command_prefix: command_prefix.into(),
        }
    }

    async fn execute(&self, message: &Message, command: Command) -> Result<()> {
        match command {
            Command::Help => {
                self.bot
                    .reply_embed(message, &help_embed(&self.command_prefix))
                    .await
            }
            Command::SetModel(Some(alias)) if self.catalog.contains(&alias) => {
                self.store.set_model_preference(&message.user.id, &alias).await;
                info!(user_id = %message.user.id, alias = %alias, "Model preference changed");
                self.bot
                    .reply_to(message, &model_changed_reply(&alias))
                    .await
            }
            Command::SetModel(alias) => {
                info!(
                    user_id = %message.user.id,
                    alias = ?alias,
                    "Rejected unknown model alias"
                );
                self.bot
                    .reply_to(message, &invalid_model_reply(self.catalog.aliases()))
                    .await
            }
            Command::Clear => {
                let key = message.conversation_key();
                self.store.reset(&key).await;
                info!(conversation_key = %key, "Conversation history cleared");
                self.bot.reply_to(message, HISTORY_CLEARED_REPLY).await
            }
            Command::ListModels => {
                let current = self.store.get_model_preference(&message.user.id).await;
                let embed = models_embed(self.catalog.aliases(), &current, &self.command_prefix);
                self.bot.reply_embed(message, &embed).await
            }
        }
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        match classify(&message.content, &self.command_prefix) {
            Inbound::Command(command) => {
                info!(user_id = %message.user.id, command = ?command, "step: running command");
                self.execute(message, command).await?;
                Ok(HandlerResponse::Stop)
            }
            Inbound::Ignored => Ok(HandlerResponse::Stop),
            Inbound::Chat(_) => Ok(HandlerResponse::Continue),
        }
    }
}
