//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Startup configuration logging with secrets redacted

use simplelog::*;
use std::fs::File;

use crate::core::config;
use crate::core::error::{AppError, AppResult};

/// Maps a LOG_LEVEL value to a filter, defaulting to `Info`.
pub fn parse_level(raw: &str) -> LevelFilter {
    match raw.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
/// * `level` - Minimum level written to both sinks
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(AppError)` - Failed to create the log file or a logger was already set
pub fn init_logger(log_file_path: &str, level: LevelFilter) -> AppResult<()> {
    let log_file = File::create(log_file_path)?;

    CombinedLogger::init(vec![
        TermLogger::new(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, Config::default(), log_file),
    ])
    .map_err(|e| AppError::Config(format!("Failed to initialize logger: {}", e)))?;

    Ok(())
}

/// Masks a secret for logs, keeping only a short prefix.
pub fn redact(secret: &str) -> String {
    if secret.is_empty() {
        return "<unset>".to_string();
    }
    let prefix: String = secret.chars().take(4).collect();
    format!("{}…({} chars)", prefix, secret.chars().count())
}

/// Logs the effective configuration at application startup
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("PORT: {}", *config::PORT);
    match config::API_BASE_URL.as_deref() {
        Some(url) => log::info!("API_BASE_URL: {}", url),
        None => log::warn!("API_BASE_URL: not set"),
    }
    log::info!("CORS_ORIGINS: {}", config::CORS_ORIGINS.join(", "));
    match config::BOT_API_URL.as_deref() {
        Some(url) => log::info!("BOT_API_URL: {}", url),
        None => log::info!("BOT_API_URL: default (api.telegram.org)"),
    }
    if config::BOT_TOKEN.is_empty() {
        log::warn!("TELEGRAM_BOT_TOKEN: not set");
    } else {
        log::info!("TELEGRAM_BOT_TOKEN: {}", redact(&config::BOT_TOKEN));
    }
    log::info!("LOG_FILE_PATH: {}", config::LOG_FILE_PATH.as_str());
}
