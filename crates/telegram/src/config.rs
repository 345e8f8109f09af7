use std::time::Duration;

use {
    reqwest::Url,
    secrecy::{ExposeSecret, Secret},
    teloxide::Bot,
};

use crate::Result;

/// Seconds `getUpdates` may hold the connection open.
pub const POLL_TIMEOUT_SECS: u32 = 30;

/// Connection settings for the bot.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    pub token: Secret<String>,
    /// Bot API base URL. Defaults to the public Telegram endpoint.
    pub api_url: Option<Url>,
}

impl TelegramConfig {
    pub fn new(token: Secret<String>) -> Self {
        Self {
            token,
            api_url: None,
        }
    }

    /// Build a client whose request timeout outlasts the long-poll timeout,
    /// so the HTTP layer does not abort a `getUpdates` Telegram is still
    /// holding open.
    pub fn build_bot(&self) -> Result<Bot> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(Duration::from_secs(u64::from(POLL_TIMEOUT_SECS) + 15))
            .build()?;
        let mut bot = Bot::with_client(self.token.expose_secret(), client);
        if let Some(url) = &self.api_url {
            bot = bot.set_api_url(url.clone());
        }
        Ok(bot)
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .finish()
    }
}
