//! Telegram side of the bot: outbound adapter and update dispatcher

use async_trait::async_trait;
use bytes::Bytes;
use linkrelay::{ChatAdapter, ConversationId, DeliveryError, Relay};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::InputFile;
use tracing::{debug, info};

/// [`ChatAdapter`] backed by the Telegram Bot API
pub struct TelegramChat {
    bot: Bot,
}

impl TelegramChat {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatAdapter for TelegramChat {
    async fn send_text(
        &self,
        conversation: ConversationId,
        text: &str,
    ) -> Result<(), DeliveryError> {
        self.bot
            .send_message(ChatId(conversation.0), text)
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError(e.to_string()))
    }

    async fn send_file(
        &self,
        conversation: ConversationId,
        filename: &str,
        body: Bytes,
    ) -> Result<(), DeliveryError> {
        let document = InputFile::memory(body.to_vec()).file_name(filename.to_string());
        self.bot
            .send_document(ChatId(conversation.0), document)
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError(e.to_string()))
    }
}

/// Run the long-polling dispatcher until Ctrl-C
///
/// Every text message is handled in its own task so one slow download
/// never holds up another chat, or the next message in the same chat.
pub async fn dispatch(bot: Bot, relay: Arc<Relay>) {
    let handler = Update::filter_message().branch(
        dptree::filter(|msg: Message| msg.text().is_some()).endpoint(handle_text_message),
    );

    info!("Starting Telegram dispatcher");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![relay])
        .default_handler(|_| async {
            debug!("Ignoring non-text update");
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_text_message(msg: Message, relay: Arc<Relay>) -> ResponseResult<()> {
    let Some(text) = msg.text().map(str::to_owned) else {
        return respond(());
    };
    let conversation = ConversationId(msg.chat.id.0);

    tokio::spawn(async move {
        relay.handle(conversation, &text).await;
    });

    respond(())
}
