//! Outbound Telegram messages

use crate::config::Settings;
use crate::infrastructure::entities::ChatId;
use crate::infrastructure::traits::Messenger;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use di::{Ref, inject, injectable};
use log::warn;
use std::time::Duration;
use teloxide::RequestError;
use teloxide::prelude::*;
use teloxide::types::{self, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub action: String,
}

/// A chat message rendered with legacy Telegram Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
    /// One button per keyboard row. Empty means no inline keyboard.
    pub buttons: Vec<InlineButton>,
}

impl OutboundMessage {
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> OutboundMessage {
        OutboundMessage {
            chat_id,
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_button(mut self, label: impl Into<String>, action: impl Into<String>) -> Self {
        self.buttons.push(InlineButton {
            label: label.into(),
            action: action.into(),
        });
        self
    }

    pub fn actions(&self) -> Vec<&str> {
        self.buttons.iter().map(|b| b.action.as_str()).collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("telegram request failed: {0}")]
    Request(#[from] RequestError),
}

pub struct TelegramMessenger {
    bot: Bot,
    retries: usize,
}

#[injectable(Messenger)]
impl TelegramMessenger {
    #[inject]
    pub fn create(settings: Ref<Settings>) -> TelegramMessenger {
        TelegramMessenger {
            bot: Bot::new(settings.bot_token()),
            retries: settings.send_retries,
        }
    }
}

impl TelegramMessenger {
    #[allow(deprecated)]
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), RequestError> {
        let request = self
            .bot
            .send_message(types::ChatId(message.chat_id), message.text.clone())
            .parse_mode(ParseMode::Markdown);

        if message.buttons.is_empty() {
            request.await?;
        } else {
            let rows = message
                .buttons
                .iter()
                .map(|b| vec![InlineKeyboardButton::callback(b.label.clone(), b.action.clone())]);
            request.reply_markup(InlineKeyboardMarkup::new(rows)).await?;
        }

        Ok(())
    }
}

/// Only transport failures and rate limits are worth another attempt; API
/// rejections (bad markup, blocked bot) will fail the same way again.
fn is_transient(error: &RequestError) -> bool {
    matches!(error, RequestError::Network(_) | RequestError::RetryAfter(_))
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, message: OutboundMessage) -> Result<(), SendError> {
        let policy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_times(self.retries);

        (|| self.deliver(&message))
            .retry(policy)
            .when(is_transient)
            .notify(|e, delay| {
                warn!(
                    "sendMessage to chat {} failed, retrying in {delay:?}: {e}",
                    message.chat_id
                )
            })
            .await
            .map_err(SendError::from)
    }

    async fn answer_callback(&self, query_id: String, text: String) -> Result<(), SendError> {
        self.bot
            .answer_callback_query(types::CallbackQueryId(query_id))
            .text(text)
            .await?;

        Ok(())
    }
}
