//! `/login <username> <password>` handler

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::relay::command::is_login_attempt;
use crate::relay::{messages, LoginCommand};

/// Handler for text messages carrying a login command.
///
/// Relay failures were already reported to the chat, so they are only logged
/// here and never surface as handler errors.
pub(super) fn login_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().map(is_login_attempt).unwrap_or(false))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let chat_id = msg.chat.id;
                let text = msg.text().unwrap_or_default();

                let Some(command) = LoginCommand::parse(text) else {
                    log::info!("Malformed /login from chat {}", chat_id);
                    bot.send_message(chat_id, messages::LOGIN_USAGE).await?;
                    return Ok(());
                };

                if let Err(e) = deps
                    .relay
                    .handle_login(chat_id, &command.username, &command.password)
                    .await
                {
                    log::warn!("Login for chat {} did not complete: {}", chat_id, e);
                }
                Ok(())
            }
        })
}
