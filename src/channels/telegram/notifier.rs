use super::render::MAX_MESSAGE_CHARS;
use crate::activity::AdminNotifier;
use crate::channels::base::split_message;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;

/// Delivers administrator traffic to a single Telegram chat, split at the
/// message size limit.
pub struct TelegramAdminNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramAdminNotifier {
    pub fn new(bot: Bot, chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl AdminNotifier for TelegramAdminNotifier {
    async fn notify(&self, text: &str) -> anyhow::Result<()> {
        for chunk in split_message(text, MAX_MESSAGE_CHARS) {
            self.bot.send_message(self.chat_id, chunk).await?;
        }
        Ok(())
    }
}
