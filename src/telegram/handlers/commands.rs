//! `/start` and `/help`

use teloxide::prelude::*;
use teloxide::types::Message;
use teloxide::utils::command::BotCommands;

use super::types::HandlerError;
use crate::relay::messages;
use crate::telegram::bot::Command;

pub(super) async fn handle_start_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, messages::WELCOME).await?;
    Ok(())
}

pub(super) async fn handle_help_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, help_text()).await?;
    Ok(())
}

fn help_text() -> String {
    format!("{}\n\n{}", Command::descriptions(), messages::LOGIN_USAGE)
}
