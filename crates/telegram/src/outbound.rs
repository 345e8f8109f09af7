use {
    async_trait::async_trait,
    daylog_channels::{ChannelOutbound, Error as ChannelError, Result},
    teloxide::{prelude::*, types::ChatId},
    tracing::{debug, info},
};

use crate::chunk::{TELEGRAM_MAX_MESSAGE_LEN, chunk_message};

/// Outbound message sender for Telegram.
///
/// Texts go out as plain text (no parse mode), so stored messages are
/// replayed exactly as the user typed them.
pub struct TelegramOutbound {
    bot: Bot,
}

impl TelegramOutbound {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChannelOutbound for TelegramOutbound {
    async fn send_text(&self, to: &str, text: &str) -> Result<()> {
        let chat_id = to
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| ChannelError::invalid_recipient(to))?;

        let chunks = chunk_message(text, TELEGRAM_MAX_MESSAGE_LEN);
        debug!(
            chat_id = to,
            text_len = text.len(),
            chunk_count = chunks.len(),
            "telegram outbound text send start"
        );

        for chunk in &chunks {
            self.bot
                .send_message(chat_id, chunk.as_str())
                .await
                .map_err(|e| ChannelError::external("send message", e))?;
        }

        if chunks.len() > 1 {
            info!(chat_id = to, chunk_count = chunks.len(), "sent long text in parts");
        }
        Ok(())
    }
}
