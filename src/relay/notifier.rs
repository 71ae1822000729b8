//! Outbound text notices to a chat.

use async_trait::async_trait;
use teloxide::prelude::*;

/// Sends a single best-effort text message to a chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, channel: ChatId, text: &str);
}

/// `Notifier` over the Bot API `sendMessage` call. Send failures are logged and dropped.
#[derive(Clone)]
pub struct BotNotifier {
    bot: Bot,
}

impl BotNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for BotNotifier {
    async fn notify(&self, channel: ChatId, text: &str) {
        if let Err(e) = self.bot.send_message(channel, text).await {
            log::error!("Failed to send notice to chat {}: {}", channel, e);
        }
    }
}
