//! Common test utilities
//!
//! This module is shared across all integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use teloxide::prelude::*;
use teloxide::types::{Me, Update, UpdateKind};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use locket_relay::core::AppResult;
use locket_relay::relay::notifier::Notifier;
use locket_relay::relay::resolver::MediaResolver;
use locket_relay::relay::{HttpLocketApi, InMemorySessionStore, PhotoVariant, SessionRelay};

/// Base URL the `StaticResolver` maps file ids under
pub const FILE_HOST: &str = "https://files.test";

/// Notifier that keeps every notice in memory
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(ChatId, String)>>,
}

impl RecordingNotifier {
    pub fn sent_to(&self, chat: ChatId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == chat)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn last_to(&self, chat: ChatId) -> Option<String> {
        self.sent_to(chat).pop()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, channel: ChatId, text: &str) {
        self.sent.lock().unwrap().push((channel, text.to_string()));
    }
}

/// Resolver mapping `file_id` to `FILE_HOST/<file_id>.jpg`
pub struct StaticResolver;

#[async_trait]
impl MediaResolver for StaticResolver {
    async fn resolve(&self, file_id: &str) -> AppResult<String> {
        Ok(file_url(file_id))
    }
}

pub fn file_url(file_id: &str) -> String {
    format!("{}/{}.jpg", FILE_HOST, file_id)
}

/// A relay talking HTTP to `server`, with in-memory collaborators
pub struct TestRelay {
    pub relay: SessionRelay,
    pub store: Arc<InMemorySessionStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestRelay {
    pub fn new(server: &MockServer) -> Self {
        let store = Arc::new(InMemorySessionStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let api = HttpLocketApi::new(&server.uri(), Duration::from_secs(5)).unwrap();

        let relay = SessionRelay::new(store.clone(), Arc::new(api), Arc::new(StaticResolver), notifier.clone());

        Self { relay, store, notifier }
    }
}

/// Three variants of one photo, smallest first, as Telegram sends them
pub fn photo_variants(prefix: &str) -> Vec<PhotoVariant> {
    [(90, 67), (320, 240), (1280, 960)]
        .iter()
        .enumerate()
        .map(|(i, (width, height))| PhotoVariant {
            file_id: format!("{}_{}", prefix, i),
            width: *width,
            height: *height,
        })
        .collect()
}

pub fn create_test_chat_id(id: i64) -> ChatId {
    ChatId(id)
}

/// Mock Telegram Bot API server answering every method with a sent message
pub struct TelegramMock {
    pub server: MockServer,
}

impl TelegramMock {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": message_json(0, json!({ "text": "ok" })),
            })))
            .mount(&server)
            .await;
        Self { server }
    }

    pub fn create_bot(&self) -> Bot {
        let url = reqwest::Url::parse(&self.server.uri()).unwrap();
        Bot::new("123456:TEST-TOKEN").set_api_url(url)
    }

    /// `(chat_id, text)` of every `sendMessage` call received so far
    pub async fn sent_messages(&self) -> Vec<(i64, String)> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path().to_lowercase().ends_with("/sendmessage"))
            .filter_map(|request| serde_json::from_slice::<serde_json::Value>(&request.body).ok())
            .map(|body| {
                (
                    body["chat_id"].as_i64().unwrap_or_default(),
                    body["text"].as_str().unwrap_or_default().to_string(),
                )
            })
            .collect()
    }
}

/// Minimal private-chat message JSON, merged with `content` (text, photo, ...)
pub fn message_json(chat_id: i64, content: serde_json::Value) -> serde_json::Value {
    let mut message = json!({
        "message_id": 1,
        "date": 1234567890,
        "chat": {
            "id": chat_id,
            "type": "private",
            "first_name": "Test"
        },
        "from": {
            "id": chat_id,
            "is_bot": false,
            "first_name": "Test",
            "username": "testuser"
        }
    });
    if let (Some(message), Some(content)) = (message.as_object_mut(), content.as_object()) {
        message.extend(content.clone());
    }
    message
}

pub fn text_update(chat_id: i64, text: &str) -> Update {
    update(message_json(chat_id, json!({ "text": text })))
}

/// Photo message carrying `variants` in the given order
pub fn photo_update(chat_id: i64, variants: &[PhotoVariant]) -> Update {
    let sizes: Vec<serde_json::Value> = variants
        .iter()
        .map(|v| {
            json!({
                "file_id": v.file_id,
                "file_unique_id": format!("unique_{}", v.file_id),
                "width": v.width,
                "height": v.height,
                "file_size": v.width * v.height,
            })
        })
        .collect();
    update(message_json(chat_id, json!({ "photo": sizes })))
}

fn update(message: serde_json::Value) -> Update {
    // Teloxide's `Update` only deserializes correctly from text, not from a `Value`
    let raw = json!({ "update_id": 1, "message": message }).to_string();
    let update: Update = serde_json::from_str(&raw).unwrap();
    assert!(
        matches!(update.kind, UpdateKind::Message(_)),
        "fixture did not parse as a message: {:?}",
        update.kind
    );
    update
}

/// The bot's own identity, needed by the command parser
pub fn bot_me() -> Me {
    serde_json::from_value(json!({
        "id": 123456,
        "is_bot": true,
        "first_name": "Locket Relay",
        "username": "LocketRelayBot",
        "can_join_groups": true,
        "can_read_all_group_messages": false,
        "supports_inline_queries": false,
        "can_connect_to_business": false,
        "has_main_web_app": false
    }))
    .unwrap()
}
