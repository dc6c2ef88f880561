//! Integration tests for [`conversation_store::InMemoryConversationStore`].
//!
//! Covers: transcript bound and FIFO order, reset, default/last-write-wins preferences,
//! key isolation, and the paired-append eviction scenario.

use conversation_store::{ConversationStore, InMemoryConversationStore, Role, TranscriptEntry};

fn store(max_turns: usize) -> InMemoryConversationStore {
    InMemoryConversationStore::new(max_turns, "lite")
}

/// **Test: Paired appends past the cap keep the transcript at 2 * max_turns.**
///
/// **Setup:** max_turns = 20.
/// **Action:** Append (user "oi", assistant "olá") 25 times, numbering the content.
/// **Expected:** Length never exceeds 40, ends at 40; the 5 oldest exchanges are gone and the
/// transcript opens on the user turn of exchange 5.
#[tokio::test]
async fn test_paired_appends_evict_oldest_exchange() {
    let store = store(20);
    for i in 0..25 {
        store.append("chan", Role::User, &format!("oi {i}")).await;
        assert!(store.read_transcript("chan").await.len() <= 40);
        store.append("chan", Role::Assistant, &format!("olá {i}")).await;
        let len = store.read_transcript("chan").await.len();
        assert_eq!(len, ((i + 1) * 2).min(40));
    }

    let transcript = store.read_transcript("chan").await;
    assert_eq!(transcript.len(), 40);
    assert_eq!(transcript[0], TranscriptEntry::user("oi 5"));
    assert_eq!(transcript[1], TranscriptEntry::assistant("olá 5"));
    assert_eq!(transcript[39], TranscriptEntry::assistant("olá 24"));
}

/// **Test: Any append sequence keeps only the most recent entries, in order.**
///
/// **Setup:** max_turns = 3; an irregular sequence of user/assistant appends.
/// **Action:** Append each entry, checking the bound and suffix property after every step.
/// **Expected:** Length ≤ 6 and the transcript is always a suffix of everything appended.
#[tokio::test]
async fn test_transcript_is_bounded_suffix_of_appends() {
    let store = store(3);
    let roles = [
        Role::User,
        Role::User,
        Role::Assistant,
        Role::User,
        Role::Assistant,
        Role::Assistant,
        Role::User,
        Role::User,
        Role::User,
        Role::Assistant,
        Role::User,
        Role::Assistant,
    ];
    let mut appended = Vec::new();
    for (i, role) in roles.iter().enumerate() {
        let content = format!("m{i}");
        store.append("k", *role, &content).await;
        appended.push(TranscriptEntry::new(*role, content));

        let transcript = store.read_transcript("k").await;
        assert!(transcript.len() <= 6);
        assert!(appended.ends_with(&transcript));
    }
}

/// **Test: reset empties a transcript and is idempotent; unknown keys read empty.**
#[tokio::test]
async fn test_reset_clears_transcript() {
    let store = store(20);
    assert!(store.read_transcript("nobody").await.is_empty());

    store.append("chan", Role::User, "oi").await;
    store.append("chan", Role::Assistant, "olá").await;
    store.reset("chan").await;
    assert!(store.read_transcript("chan").await.is_empty());

    store.reset("chan").await;
    store.reset("never-seen").await;
    assert!(store.read_transcript("chan").await.is_empty());
    assert!(store.read_transcript("never-seen").await.is_empty());
}

/// **Test: Preference defaults until set, then last write wins; aliases are not validated.**
#[tokio::test]
async fn test_model_preference_default_and_last_write_wins() {
    let store = store(20);
    assert_eq!(store.get_model_preference("42").await, "lite");

    store.set_model_preference("42", "pro").await;
    store.set_model_preference("42", "flash").await;
    assert_eq!(store.get_model_preference("42").await, "flash");

    store.set_model_preference("7", "whatever").await;
    assert_eq!(store.get_model_preference("7").await, "whatever");
    assert_eq!(store.get_model_preference("8").await, "lite");
}

/// **Test: Conversations are isolated and clones share state.**
#[tokio::test]
async fn test_keys_isolated_and_clones_share_state() {
    let store = store(20);
    let clone = store.clone();

    store.append("dm_1", Role::User, "a").await;
    clone.append("chan", Role::User, "b").await;

    assert_eq!(store.read_transcript("chan").await, vec![TranscriptEntry::user("b")]);
    assert_eq!(clone.read_transcript("dm_1").await, vec![TranscriptEntry::user("a")]);
    store.reset("dm_1").await;
    assert_eq!(clone.read_transcript("chan").await.len(), 1);
    assert_eq!(store.conversation_count().await, 2);
}
