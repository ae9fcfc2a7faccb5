use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;
use webchat::annotate::plain_text;
use webchat::config::{InputConfig, WebhookConfig};
use webchat::error::TRANSCRIPTION_FAILED_MESSAGE;
use webchat::{
    AudioClip, CardKind, ChatError, ConversationStore, RequestState, Segment, WebhookClient,
};

fn store_for(server: &mockito::ServerGuard) -> ConversationStore {
    let config = WebhookConfig {
        base_url: server.url(),
        ..WebhookConfig::default()
    };
    let client = WebhookClient::from_config(&config).unwrap();
    ConversationStore::new(Arc::new(client))
}

#[tokio::test]
async fn send_message_renders_reply() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/query")
        .with_status(200)
        .with_body(r#"{"output":"hi"}"#)
        .create_async()
        .await;

    let store = store_for(&server);
    let segments = store.send_message("hello").await.unwrap();

    assert_eq!(segments, vec![Segment::text("hi")]);
    assert_eq!(plain_text(&segments), "hi");
    assert_eq!(store.messages().len(), 2);
}

#[tokio::test]
async fn empty_reply_raises_invalid_response_and_keeps_user_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/query")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let store = store_for(&server);
    let err = store.send_message("hello").await.unwrap_err();

    assert!(matches!(err, ChatError::InvalidResponse { .. }));
    let state = store.snapshot();
    assert_eq!(state.messages.len(), 1);
    assert!(state.messages[0].is_user());
    assert!(matches!(state.request, RequestState::Error(_)));
}

#[tokio::test]
async fn reply_with_cards_renders_segments() {
    let reply = "Two picks:\n\n```xml\n<book>\n<title>Dune</title>\n<price>$10</price>\n</book>\n<book>\n<title>Hyperion</title>\n</book>\n```\n\nMore at https://books.example";
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/query")
        .with_status(200)
        .with_body(json!({ "output": reply }).to_string())
        .create_async()
        .await;

    let store = store_for(&server);
    let segments = store.send_message("books?").await.unwrap();

    let cards: Vec<_> = segments
        .iter()
        .filter(|s| matches!(s, Segment::CardRef { kind: CardKind::Book, .. }))
        .collect();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].card_field("price"), Some("$10"));
    assert_eq!(cards[1].card_field("price"), Some(""));
    assert_eq!(segments.last(), Some(&Segment::link("https://books.example")));
    assert_eq!(store.messages()[1].segments(), segments);
}

#[tokio::test]
async fn short_recording_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let transcribe = server
        .mock("POST", "/transcribe")
        .expect(0)
        .create_async()
        .await;

    let store = store_for(&server);
    let err = store
        .send_voice(AudioClip::new(vec![b'a'; 10], "audio/webm"))
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::RecordingTooShort { .. }));
    transcribe.assert_async().await;
}

#[tokio::test]
async fn voice_input_transcribes_then_asks() {
    let mut server = mockito::Server::new_async().await;
    let transcribe = server
        .mock("POST", "/transcribe")
        .with_status(200)
        .with_body(r#"{"text":"top news"}"#)
        .create_async()
        .await;
    let query = server
        .mock("POST", "/query")
        .match_body(Matcher::Json(json!({ "query": "top news" })))
        .with_status(200)
        .with_body(r#"{"output":"Here are today's headlines"}"#)
        .create_async()
        .await;

    let client = WebhookClient::builder().base_url(server.url()).build().unwrap();
    let store = ConversationStore::with_limits(
        Arc::new(client),
        InputConfig {
            min_audio_bytes: 16,
            ..InputConfig::default()
        },
    );
    let segments = store
        .send_voice(AudioClip::new(vec![b'a'; 64], "audio/wav"))
        .await
        .unwrap();

    assert_eq!(plain_text(&segments), "Here are today's headlines");
    assert_eq!(store.messages()[0].text(), "top news");
    transcribe.assert_async().await;
    query.assert_async().await;
}

#[tokio::test]
async fn server_error_sets_banner() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/query")
        .with_status(503)
        .create_async()
        .await;

    let store = store_for(&server);
    let err = store.send_message("hello").await.unwrap_err();

    assert!(err.is_network_failure());
    assert_eq!(store.error().as_deref(), Some(err.user_message()));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn transcription_server_error_sets_voice_banner() {
    let mut server = mockito::Server::new_async().await;
    let _transcribe = server
        .mock("POST", "/transcribe")
        .with_status(500)
        .create_async()
        .await;
    let query = server.mock("POST", "/query").expect(0).create_async().await;

    let store = store_for(&server);
    let err = store
        .send_voice(AudioClip::new(vec![b'a'; 2048], "audio/webm"))
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::StatusError { status: 500, .. }));
    assert_eq!(store.error().as_deref(), Some(TRANSCRIPTION_FAILED_MESSAGE));
    assert!(store.messages().is_empty());
    assert!(!store.is_loading());
    query.assert_async().await;
}
