//! Integration tests for the `!miku` command surface through the full handler chain.
//!
//! Covers: model selection (valid, unknown, missing alias), history reset, the model list
//! embed, help for unknown sub-commands, and other bots' commands being ignored.


use conversation_store::{ConversationStore, Role};
use dbot_core::HandlerResponse;
use discord_bot::commands::{HELP_COLOR, HISTORY_CLEARED_REPLY, MODELS_COLOR};
use mocks::{harness, message};

/// **Test: `modelo nonexistent` lists the valid aliases and leaves the preference unchanged.**
#[tokio::test]
async fn test_unknown_model_alias_is_rejected_with_alias_list() {
    let h = harness(20, 1900, vec![]);

    let response = h
        .chain
        .handle(&message(Some("100"), "!miku modelo nonexistent"))
        .await
        .unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert_eq!(
        h.bot.replies(),
        vec!["Modelo inválido. Modelos disponíveis: lite, flash, pro".to_string()]
    );
    assert_eq!(h.store.get_model_preference("42").await, "lite");
    assert!(h.backend.calls().is_empty());
}

/// **Test: `modelo` without an alias gets the same corrective reply.**
#[tokio::test]
async fn test_missing_model_alias_is_rejected() {
    let h = harness(20, 1900, vec![]);

    h.chain
        .handle(&message(Some("100"), "!miku modelo"))
        .await
        .unwrap();

    assert_eq!(
        h.bot.replies(),
        vec!["Modelo inválido. Modelos disponíveis: lite, flash, pro".to_string()]
    );
    assert_eq!(h.store.get_model_preference("42").await, "lite");
}

/// **Test: A valid alias is stored per user and used for the next chat turn.**
#[tokio::test]
async fn test_valid_model_alias_changes_preference() {
    let h = harness(20, 1900, vec![]);

    h.chain
        .handle(&message(Some("100"), "!miku modelo pro"))
        .await
        .unwrap();
    h.chain
        .handle(&message(Some("200"), "oi"))
        .await
        .unwrap();

    assert_eq!(h.bot.replies()[0], "✅ Modelo alterado para: pro");
    assert_eq!(h.store.get_model_preference("42").await, "pro");
    assert_eq!(h.backend.calls()[0].0, "gemini-2.5-pro");
}

/// **Test: `limpar` empties the channel transcript and is not itself recorded.**
#[tokio::test]
async fn test_clear_resets_conversation() {
    let h = harness(20, 1900, vec![]);
    h.chain
        .handle(&message(Some("100"), "oi"))
        .await
        .unwrap();
    assert_eq!(h.store.read_transcript("100").await.len(), 2);

    h.chain
        .handle(&message(Some("100"), "!miku limpar"))
        .await
        .unwrap();

    assert!(h.store.read_transcript("100").await.is_empty());
    assert_eq!(h.bot.replies().last().unwrap(), HISTORY_CLEARED_REPLY);
}

/// **Test: `modelos` replies with an embed marking the caller's current alias.**
#[tokio::test]
async fn test_models_lists_aliases_marking_current() {
    let h = harness(20, 1900, vec![]);
    h.store.set_model_preference("42", "flash").await;

    h.chain
        .handle(&message(None, "!miku modelos"))
        .await
        .unwrap();

    let embeds = h.bot.embeds();
    assert_eq!(embeds.len(), 1);
    assert_eq!(embeds[0].color, MODELS_COLOR);
    assert_eq!(
        embeds[0].description.as_deref(),
        Some("• lite\n✅ flash\n• pro")
    );
}

/// **Test: Unknown sub-commands and the bare prefix show the help embed.**
#[tokio::test]
async fn test_unknown_sub_command_shows_help() {
    let h = harness(20, 1900, vec![]);

    h.chain
        .handle(&message(Some("100"), "!miku dança"))
        .await
        .unwrap();
    h.chain
        .handle(&message(Some("100"), "!miku"))
        .await
        .unwrap();

    let embeds = h.bot.embeds();
    assert_eq!(embeds.len(), 2);
    assert!(embeds.iter().all(|e| e.color == HELP_COLOR));
    assert_eq!(embeds[0].title, "🤖 Comandos do Miku Bot");
    assert!(h.store.read_transcript("100").await.is_empty());
}

/// **Test: Other bots' commands get no reply, no generation and no transcript entry.**
#[tokio::test]
async fn test_other_bot_commands_are_ignored() {
    let h = harness(20, 1900, vec![]);

    for text in ["!play música", "/roll", ".ping"] {
        let response = h
            .chain
            .handle(&message(Some("100"), text))
            .await
            .unwrap();
        assert_eq!(response, HandlerResponse::Stop);
    }

    assert!(h.bot.sent().is_empty());
    assert!(h.backend.calls().is_empty());
    assert!(h.store.read_transcript("100").await.is_empty());
}

/// **Test: Commands never add user turns to the transcript.**
#[tokio::test]
async fn test_commands_are_not_recorded() {
    let h = harness(20, 1900, vec![]);

    h.chain
        .handle(&message(Some("100"), "!miku ajuda"))
        .await
        .unwrap();
    h.chain
        .handle(&message(Some("100"), "olá"))
        .await
        .unwrap();

    let transcript = h.store.read_transcript("100").await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].role, Role::User);
    assert_eq!(transcript[0].content, "olá");
}
