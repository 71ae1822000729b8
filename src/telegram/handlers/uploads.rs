//! Photo upload handler

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::relay::PhotoVariant;

/// Handler for photo messages: every variant is passed on and the relay
/// uploads the largest one.
pub(super) fn photo_upload_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.photo().is_some())
        .endpoint(move |msg: Message| {
            let deps = deps.clone();
            async move {
                let chat_id = msg.chat.id;
                let variants: Vec<PhotoVariant> = msg
                    .photo()
                    .map(|sizes| sizes.iter().map(PhotoVariant::from).collect())
                    .unwrap_or_default();

                log::debug!("Photo from chat {} with {} variants", chat_id, variants.len());

                if let Err(e) = deps.relay.handle_photo(chat_id, &variants).await {
                    log::warn!("Photo upload for chat {} did not complete: {}", chat_id, e);
                }
                Ok(())
            }
        })
}
