//! Configuration values for the relay
//!
//! Every value is read once from the environment on first access, so `.env`
//! files must be loaded (see `load_env_files`) before anything here is touched.

use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::core::error::{AppError, AppResult};

/// Default HTTP port when PORT is unset or not a valid port number
pub const DEFAULT_PORT: u16 = 3000;

/// Default CORS origins, matching the web uploader deployments
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,https://locket-uploader.vercel.app";

/// Telegram bot token
/// Read from TELEGRAM_BOT_TOKEN, falling back to BOT_TOKEN
/// Empty when neither is set; `run` refuses to start in that case
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("TELEGRAM_BOT_TOKEN")
        .or_else(|_| env::var("BOT_TOKEN"))
        .unwrap_or_default()
});

/// HTTP listener port
/// Read from PORT environment variable
/// Default: 3000
pub static PORT: Lazy<u16> = Lazy::new(|| parse_port(env::var("PORT").ok().as_deref()));

/// Base URL of the Locket API the relay talks to
/// Read from API_BASE_URL; `run` refuses to start without it
pub static API_BASE_URL: Lazy<Option<String>> = Lazy::new(|| api_base_url(env::var("API_BASE_URL").ok().as_deref()));

/// Custom Telegram Bot API server (e.g. a local telegram-bot-api instance)
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| env::var("BOT_API_URL").ok());

/// Allowed CORS origins for the HTTP listener
/// Read from CORS_ORIGINS as a comma-separated list
pub static CORS_ORIGINS: Lazy<Vec<String>> = Lazy::new(|| {
    parse_origins(
        env::var("CORS_ORIGINS")
            .ok()
            .as_deref()
            .unwrap_or(DEFAULT_CORS_ORIGINS),
    )
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Log level name (error, warn, info, debug, trace)
/// Default: info
pub static LOG_LEVEL: Lazy<String> = Lazy::new(|| env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

/// Picks the dotenv file for the given APP_ENV value.
pub fn env_file_for(app_env: Option<&str>) -> &'static str {
    match app_env {
        Some(value) if value.eq_ignore_ascii_case("production") => ".env.production",
        _ => ".env.development",
    }
}

/// Loads the environment-specific dotenv file, then a plain `.env` as fallback.
///
/// Variables already present in the process environment are never overridden.
/// Returns the name of the environment-specific file that was loaded, if any.
pub fn load_env_files(force_production: bool) -> Option<&'static str> {
    let app_env = if force_production {
        Some("production".to_string())
    } else {
        env::var("APP_ENV").ok()
    };
    let file = env_file_for(app_env.as_deref());

    let loaded = dotenvy::from_filename(file).ok().map(|_| file);
    let _ = dotenvy::dotenv();
    loaded
}

/// Parses a PORT value, falling back to `DEFAULT_PORT`.
pub fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|s| s.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(DEFAULT_PORT)
}

/// Normalizes the API base URL, trimming a trailing slash. Blank means unset.
pub fn api_base_url(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|url| url.trim_end_matches('/').to_string())
}

/// Settings the bot cannot run without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaySettings<'a> {
    pub bot_token: &'a str,
    pub api_base_url: &'a str,
}

/// Checks that the bot token and the API base URL are both present.
///
/// # Errors
/// `AppError::Config` naming the first missing variable.
pub fn relay_settings<'a>(bot_token: &'a str, api_base_url: Option<&'a str>) -> AppResult<RelaySettings<'a>> {
    if bot_token.trim().is_empty() {
        return Err(AppError::Config("TELEGRAM_BOT_TOKEN is not set".to_string()));
    }
    let api_base_url = api_base_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::Config("API_BASE_URL is not set".to_string()))?;

    Ok(RelaySettings { bot_token, api_base_url })
}

/// Splits a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

/// Retry configuration for the update dispatcher
pub mod retry {
    use super::Duration;

    /// Maximum number of retries for dispatcher reconnection
    pub const MAX_DISPATCHER_RETRIES: u32 = 5;

    /// Delay between dispatcher retry attempts (in seconds)
    pub const DISPATCHER_RETRY_DELAY_SECS: u64 = 5;

    /// Dispatcher retry delay duration
    pub fn dispatcher_delay() -> Duration {
        Duration::from_secs(DISPATCHER_RETRY_DELAY_SECS)
    }

    /// Base for exponential backoff calculation
    pub const EXPONENTIAL_BACKOFF_BASE: u64 = 2;
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for outbound HTTP requests (in seconds)
    /// Applies to the Locket API client and the Telegram client alike
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_env_file_selection() {
        assert_eq!(env_file_for(Some("production")), ".env.production");
        assert_eq!(env_file_for(Some("PRODUCTION")), ".env.production");
        assert_eq!(env_file_for(Some("staging")), ".env.development");
        assert_eq!(env_file_for(None), ".env.development");
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port(Some("8080")), 8080);
        assert_eq!(parse_port(Some(" 4000 ")), 4000);
        assert_eq!(parse_port(Some("not-a-port")), DEFAULT_PORT);
        assert_eq!(parse_port(Some("70000")), DEFAULT_PORT);
        assert_eq!(parse_port(Some("0")), DEFAULT_PORT);
        assert_eq!(parse_port(None), DEFAULT_PORT);
    }

    #[test]
    fn test_api_base_url_has_no_default() {
        assert_eq!(api_base_url(None), None);
        assert_eq!(api_base_url(Some("  ")), None);
    }

    #[test]
    fn test_api_base_url_trims_trailing_slash() {
        assert_eq!(
            api_base_url(Some("https://api.example.com/")),
            Some("https://api.example.com".to_string())
        );
    }

    #[test]
    fn test_relay_settings_require_api_base_url() {
        let err = relay_settings("123:ABC", None).unwrap_err();
        assert!(matches!(&err, AppError::Config(msg) if msg.contains("API_BASE_URL")));

        let err = relay_settings("123:ABC", Some(" ")).unwrap_err();
        assert!(matches!(&err, AppError::Config(msg) if msg.contains("API_BASE_URL")));
    }

    #[test]
    fn test_relay_settings_require_bot_token_first() {
        let err = relay_settings("", None).unwrap_err();
        assert!(matches!(&err, AppError::Config(msg) if msg.contains("TELEGRAM_BOT_TOKEN")));
    }

    #[test]
    fn test_relay_settings_accept_complete_configuration() {
        let settings = relay_settings("123:ABC", Some("https://api.example.com")).unwrap();
        assert_eq!(
            settings,
            RelaySettings {
                bot_token: "123:ABC",
                api_base_url: "https://api.example.com",
            }
        );
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(DEFAULT_CORS_ORIGINS),
            vec![
                "http://localhost:3000".to_string(),
                "https://locket-uploader.vercel.app".to_string()
            ]
        );
        assert_eq!(
            parse_origins(" https://a.example/ ,, https://b.example"),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_network_timeout() {
        assert_eq!(network::timeout(), Duration::from_secs(network::REQUEST_TIMEOUT_SECS));
    }
}
