//! Locket API client.
//!
//! Two calls: `POST /login` exchanges credentials for a bearer token, and
//! `POST /upload` hands a fetchable image URL to the API under that token.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::core::error::AppResult;
use crate::core::logging::redact;

/// Failure of a single Locket API call
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success status
    #[error("Request failed with status code {status}")]
    Rejected {
        status: u16,
        /// `message` field of the JSON error body, when present and non-empty
        message: Option<String>,
    },

    /// The request never produced a response (connect, timeout, body decode)
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// The API-provided message, if the response carried one.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            ApiError::Transport(_) => None,
        }
    }

    /// Text shown to the user: the API's message, else a description of the failure.
    pub fn user_message(&self) -> String {
        self.api_message().map(str::to_owned).unwrap_or_else(|| self.to_string())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// Successful `/login` response body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: Option<String>,
}

impl LoginResponse {
    /// Extracts the token from a raw response body.
    ///
    /// The token is opaque: a JSON string is taken as is and a JSON number in
    /// its decimal form. Missing, null, empty or any other shape means no token.
    pub fn from_body(body: &str) -> Self {
        let token = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| match value.get("token") {
                Some(serde_json::Value::String(token)) => Some(token.clone()),
                Some(serde_json::Value::Number(token)) => Some(token.to_string()),
                _ => None,
            })
            .filter(|token| !token.is_empty());
        Self { token }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest<'a> {
    image_url: &'a str,
}

/// The Locket API surface the relay depends on.
#[async_trait]
pub trait LocketApi: Send + Sync {
    /// Exchanges credentials for a token.
    ///
    /// A success status with a body lacking a string `token` yields
    /// `LoginResponse { token: None }`, not an error.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// Submits `image_url` for upload, authorized by `token`.
    async fn upload(&self, token: &str, image_url: &str) -> Result<(), ApiError>;
}

/// reqwest-backed `LocketApi`
#[derive(Debug, Clone)]
pub struct HttpLocketApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLocketApi {
    /// Creates a client for `base_url` with the given request timeout.
    ///
    /// # Errors
    /// `AppError::Url` if `base_url` is not an absolute URL, `AppError::Http`
    /// if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Creates a client reusing an existing reqwest client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> AppResult<Self> {
        url::Url::parse(base_url)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Turns a non-success response into `ApiError::Rejected`, keeping the JSON `message`.
async fn rejection(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .filter(|m| !m.is_empty());
    ApiError::Rejected { status, message }
}

#[async_trait]
impl LocketApi for HttpLocketApi {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        log::debug!("POST {} as {:?}", self.endpoint("login"), username);

        let response = self
            .client
            .post(self.endpoint("login"))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let body = response.text().await?;
        Ok(LoginResponse::from_body(&body))
    }

    async fn upload(&self, token: &str, image_url: &str) -> Result<(), ApiError> {
        log::debug!("POST {} with token {}", self.endpoint("upload"), redact(token));

        let response = self
            .client
            .post(self.endpoint("upload"))
            .bearer_auth(token)
            .json(&UploadRequest { image_url })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        Ok(())
    }
}
