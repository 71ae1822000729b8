//! Session store: one bearer token per chat.

use dashmap::DashMap;
use teloxide::types::ChatId;

/// Key-value storage for chat sessions.
///
/// Implementations must make each `set`/`get` atomic per key; nothing else is
/// required, so a persistent or TTL-based backend can replace the in-memory one
/// without touching the handlers.
pub trait SessionStore: Send + Sync {
    /// Stores `token` for `channel`, replacing any previous token.
    fn set(&self, channel: ChatId, token: String);

    /// Returns the token stored for `channel`, if any.
    fn get(&self, channel: ChatId) -> Option<String>;
}

/// Process-lifetime session store. No eviction, no capacity bound.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<ChatId, String>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chats holding a token
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn set(&self, channel: ChatId, token: String) {
        self.sessions.insert(channel, token);
    }

    fn get(&self, channel: ChatId) -> Option<String> {
        self.sessions.get(&channel).map(|entry| entry.value().clone())
    }
}
