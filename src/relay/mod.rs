//! Session relay between Telegram chats and the Locket API
//!
//! A chat logs in with `/login`, the returned bearer token is kept against the
//! chat id, and every later photo from that chat is uploaded under it.
//!
//! Per chat the relay moves `UNAUTHENTICATED → AUTHENTICATED` on the first
//! successful login and never back; later logins only replace the token.
//! Every external failure ends as exactly one notice to the chat.

pub mod api;
pub mod command;
pub mod messages;
pub mod notifier;
pub mod resolver;
pub mod store;

use std::fmt;
use std::sync::Arc;

use teloxide::types::{ChatId, PhotoSize};
use thiserror::Error;

use crate::core::error::AppError;
use api::{ApiError, LocketApi};
use notifier::Notifier;
use resolver::MediaResolver;
use store::SessionStore;

pub use api::HttpLocketApi;
pub use command::LoginCommand;
pub use notifier::BotNotifier;
pub use resolver::TelegramFileResolver;
pub use store::InMemorySessionStore;

/// Which external exchange a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStage {
    Login,
    Upload,
}

impl fmt::Display for RelayStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayStage::Login => write!(f, "login"),
            RelayStage::Upload => write!(f, "upload"),
        }
    }
}

/// Why a relay operation did not complete.
///
/// Each variant has already been reported to the chat by the time the handler
/// returns it; callers only log.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The API rejected the credentials
    #[error("authentication failed: {0}")]
    AuthenticationFailure(#[source] ApiError),

    /// The API accepted the credentials but returned no token
    #[error("authentication failed: login response carried no token")]
    MissingToken,

    /// A photo arrived from a chat with no cached token
    #[error("chat {0} is not logged in")]
    NotAuthenticated(ChatId),

    /// The API rejected the upload
    #[error("upload failed: {0}")]
    UploadFailure(#[source] ApiError),

    /// The photo could not be resolved to a fetchable URL
    #[error("upload failed: could not resolve photo: {0}")]
    Unresolvable(#[source] AppError),

    /// No response from the API at all
    #[error("{stage} transport failure: {source}")]
    TransportFailure {
        stage: RelayStage,
        #[source]
        source: ApiError,
    },
}

impl RelayError {
    fn from_api(stage: RelayStage, err: ApiError) -> Self {
        match (stage, err) {
            (stage, err @ ApiError::Transport(_)) => RelayError::TransportFailure { stage, source: err },
            (RelayStage::Login, err) => RelayError::AuthenticationFailure(err),
            (RelayStage::Upload, err) => RelayError::UploadFailure(err),
        }
    }

    /// True for every failure of the credential exchange, including a missing token.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            RelayError::AuthenticationFailure(_)
                | RelayError::MissingToken
                | RelayError::TransportFailure {
                    stage: RelayStage::Login,
                    ..
                }
        )
    }

    /// The notice sent to the chat for this failure.
    pub fn notice(&self) -> String {
        match self {
            RelayError::AuthenticationFailure(e) => messages::login_failed(&e.user_message()),
            RelayError::MissingToken => messages::LOGIN_NO_TOKEN.to_string(),
            RelayError::NotAuthenticated(_) => messages::NOT_AUTHENTICATED.to_string(),
            RelayError::UploadFailure(e) => messages::upload_failed(&e.user_message()),
            RelayError::Unresolvable(e) => messages::upload_failed(&e.to_string()),
            RelayError::TransportFailure { stage, source } => match stage {
                RelayStage::Login => messages::login_failed(&source.user_message()),
                RelayStage::Upload => messages::upload_failed(&source.user_message()),
            },
        }
    }
}

/// One rendering of a photo, as delivered by Telegram (smallest first)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoVariant {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
}

impl From<&PhotoSize> for PhotoVariant {
    fn from(size: &PhotoSize) -> Self {
        Self {
            file_id: size.file.id.0.clone(),
            width: size.width,
            height: size.height,
        }
    }
}

/// Picks the highest-resolution variant: the last one, per Telegram's ordering.
pub fn select_largest(variants: &[PhotoVariant]) -> Option<&PhotoVariant> {
    variants.last()
}

/// Relays logins and photo uploads for all chats.
///
/// Built once at startup and shared through `Arc`; it owns no global state.
pub struct SessionRelay {
    sessions: Arc<dyn SessionStore>,
    api: Arc<dyn LocketApi>,
    resolver: Arc<dyn MediaResolver>,
    notifier: Arc<dyn Notifier>,
}

impl SessionRelay {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        api: Arc<dyn LocketApi>,
        resolver: Arc<dyn MediaResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            sessions,
            api,
            resolver,
            notifier,
        }
    }

    /// Exchanges credentials for a token and caches it for `channel`.
    ///
    /// Writes the store exactly once on success and never on failure. The chat
    /// gets one notice either way.
    pub async fn handle_login(&self, channel: ChatId, username: &str, password: &str) -> Result<(), RelayError> {
        log::info!("Login attempt from chat {} as {:?}", channel, username);

        let outcome = match self.api.login(username, password).await {
            Ok(response) => match response.token.filter(|token| !token.is_empty()) {
                Some(token) => {
                    self.sessions.set(channel, token);
                    Ok(())
                }
                None => Err(RelayError::MissingToken),
            },
            Err(e) => Err(RelayError::from_api(RelayStage::Login, e)),
        };

        self.report(channel, &outcome, messages::LOGIN_SUCCESS).await;
        outcome
    }

    /// Uploads the largest variant of a photo under the chat's cached token.
    ///
    /// Without a token the chat is told to log in and no network call is made.
    /// A single attempt is made; the token is kept whatever the API answers.
    pub async fn handle_photo(&self, channel: ChatId, variants: &[PhotoVariant]) -> Result<(), RelayError> {
        let Some(token) = self.sessions.get(channel) else {
            log::info!("Photo from chat {} rejected: not logged in", channel);
            let err = RelayError::NotAuthenticated(channel);
            self.notifier.notify(channel, &err.notice()).await;
            return Err(err);
        };

        let Some(photo) = select_largest(variants) else {
            log::warn!("Photo message from chat {} carried no variants", channel);
            return Ok(());
        };
        log::info!(
            "Uploading photo {} ({}x{}) for chat {}",
            photo.file_id,
            photo.width,
            photo.height,
            channel
        );

        let outcome = self.upload(&token, photo).await;
        self.report(channel, &outcome, messages::UPLOAD_SUCCESS).await;
        outcome
    }

    async fn upload(&self, token: &str, photo: &PhotoVariant) -> Result<(), RelayError> {
        let image_url = self
            .resolver
            .resolve(&photo.file_id)
            .await
            .map_err(RelayError::Unresolvable)?;

        self.api
            .upload(token, &image_url)
            .await
            .map_err(|e| RelayError::from_api(RelayStage::Upload, e))
    }

    async fn report(&self, channel: ChatId, outcome: &Result<(), RelayError>, success: &str) {
        match outcome {
            Ok(()) => self.notifier.notify(channel, success).await,
            Err(e) => {
                log::warn!("Relay failure for chat {}: {}", channel, e);
                self.notifier.notify(channel, &e.notice()).await;
            }
        }
    }
}
