use async_trait::async_trait;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{info, warn};

use common::{Error, Notifier, Result, Signal};

use crate::format::render_signal;

/// Delivers rendered signals to a single Telegram chat.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
    pair: String,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_id: i64, pair: impl Into<String>) -> Self {
        Self {
            bot: Bot::new(token),
            chat_id: ChatId(chat_id),
            pair: pair.into(),
        }
    }

    // Legacy Markdown keeps `*bold*` working without MarkdownV2 escaping.
    #[allow(deprecated)]
    async fn send(&self, text: String) -> Result<()> {
        let preview: String = text.chars().take(20).collect();
        match self
            .bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Markdown)
            .await
        {
            Ok(_) => {
                info!(chat_id = self.chat_id.0, preview = %preview, "Telegram message sent");
                Ok(())
            }
            Err(e) => {
                warn!(chat_id = self.chat_id.0, error = %e, "Failed to send Telegram message");
                Err(Error::Notify(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn deliver(&self, signal: &Signal) -> Result<()> {
        self.send(render_signal(signal, &self.pair)).await
    }

    async fn announce(&self, text: &str) -> Result<()> {
        self.send(text.to_string()).await
    }
}
