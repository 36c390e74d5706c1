//! Environment driven settings

use crate::infrastructure::entities::ChatId;
use anyhow::{Context, anyhow};
use std::env;
use std::fmt::{Debug, Formatter};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_SEND_RETRIES: usize = 3;

#[derive(Clone)]
pub struct Settings {
    bot_token: String,
    pub bind_address: String,
    /// Chats that get notified when a registration completes.
    pub admin_chat_ids: Vec<ChatId>,
    pub send_retries: usize,
}

impl Settings {
    pub fn new(bot_token: impl Into<String>) -> Settings {
        Settings {
            bot_token: bot_token.into(),
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
            admin_chat_ids: Vec::new(),
            send_retries: DEFAULT_SEND_RETRIES,
        }
    }

    /// Reads settings from the process environment, after loading `.env` if present.
    pub fn from_env() -> anyhow::Result<Settings> {
        dotenvy::dotenv().ok();
        Settings::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Settings> {
        let bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        let mut settings = Settings::new(bot_token.trim());

        if let Some(address) = lookup("BIND_ADDRESS") {
            settings.bind_address = address;
        }

        if let Some(ids) = lookup("ADMIN_CHAT_IDS") {
            settings.admin_chat_ids = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| {
                    id.parse::<ChatId>()
                        .with_context(|| format!("invalid chat id in ADMIN_CHAT_IDS: {id}"))
                })
                .collect::<anyhow::Result<_>>()?;
        }

        if let Some(retries) = lookup("SEND_RETRIES") {
            settings.send_retries = retries
                .trim()
                .parse()
                .with_context(|| format!("SEND_RETRIES must be a number, got {retries}"))?;
        }

        Ok(settings)
    }

    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }
}

impl Debug for Settings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("bot_token", &"<redacted>")
            .field("bind_address", &self.bind_address)
            .field("admin_chat_ids", &self.admin_chat_ids)
            .field("send_retries", &self.send_retries)
            .finish()
    }
}
