//! Bot initialization
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command list registration

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;
use crate::core::error::{AppError, AppResult};

/// Bot commands enum with descriptions
///
/// `/login` is not listed here: its two free-text arguments are parsed by
/// [`crate::relay::LoginCommand`] rather than by the command parser.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "show the welcome message")]
    Start,
    #[command(description = "show this help")]
    Help,
}

/// Creates a Bot instance with custom or default API URL
///
/// # Arguments
/// * `token` - Telegram bot token
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(AppError)` - Empty token, invalid BOT_API_URL or HTTP client failure
pub fn create_bot(token: &str) -> AppResult<Bot> {
    if token.trim().is_empty() {
        return Err(AppError::Config("TELEGRAM_BOT_TOKEN is not set".to_string()));
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(token, client);

    let bot = match config::BOT_API_URL.as_deref() {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            bot.set_api_url(url::Url::parse(bot_api_url)?)
        }
        None => bot,
    };

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    use teloxide::types::BotCommand;

    bot.set_my_commands(vec![
        BotCommand::new("start", "show the welcome message"),
        BotCommand::new("help", "show this help"),
        BotCommand::new("login", "log in: /login <username> <password>"),
    ])
    .await?;

    Ok(())
}
