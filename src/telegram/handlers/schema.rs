//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::{handle_help_command, handle_start_command};
use super::login::login_handler;
use super::types::{HandlerDeps, HandlerError};
use super::uploads::photo_upload_handler;
use crate::telegram::bot::Command;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Branch order matters: `/login` texts are claimed before the command
/// parser sees them, and photos go to the uploader. Anything else is ignored.
///
/// # Arguments
/// * `deps` - Handler dependencies (the shared session relay)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_login = deps.clone();
    let deps_photo = deps.clone();

    dptree::entry()
        .branch(login_handler(deps_login))
        .branch(photo_upload_handler(deps_photo))
        .branch(command_handler())
}

fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        |bot: Bot, msg: Message, cmd: Command| async move {
            log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);

            match cmd {
                Command::Start => handle_start_command(&bot, &msg).await?,
                Command::Help => handle_help_command(&bot, &msg).await?,
            }
            Ok(())
        },
    ))
}
