//! Resolution of Telegram file ids into fetchable URLs.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::FileId;
use url::Url;

use crate::core::error::{AppError, AppResult};

/// Turns an opaque media reference into a URL the Locket API can fetch.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    async fn resolve(&self, file_id: &str) -> AppResult<String>;
}

/// Resolver backed by the Bot API `getFile` call
#[derive(Clone)]
pub struct TelegramFileResolver {
    bot: Bot,
}

impl TelegramFileResolver {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MediaResolver for TelegramFileResolver {
    async fn resolve(&self, file_id: &str) -> AppResult<String> {
        let file = self.bot.get_file(FileId(file_id.to_string())).await?;
        log::debug!("Resolved file {} to path {} ({} bytes)", file_id, file.path, file.size);

        let base_url = self.bot.api_url();
        let url = build_file_url(&base_url, self.bot.token(), &file.path)?;
        Ok(url.to_string())
    }
}

/// Builds `<base>/file/bot<token>/<path>`.
///
/// A local Bot API server reports absolute paths under its working directory;
/// that prefix is stripped so the URL points at the server's file route.
pub fn build_file_url(base: &Url, token: &str, file_path: &str) -> AppResult<Url> {
    let mut url = base.clone();

    let normalized_path = if base.host_str() == Some("api.telegram.org") {
        file_path
    } else {
        let container_prefix = "/var/lib/telegram-bot-api/";
        file_path.strip_prefix(container_prefix).unwrap_or(file_path)
    };

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| AppError::Config("BOT_API_URL cannot be a base URL".to_string()))?;
        segments.pop_if_empty();
        segments.push("file");
        segments.push(&format!("bot{token}"));
        for seg in normalized_path.split('/') {
            if !seg.is_empty() {
                segments.push(seg);
            }
        }
    }

    Ok(url)
}
