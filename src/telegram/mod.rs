//! Telegram bot integration and handlers

pub mod bot;
pub mod handlers;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError};
