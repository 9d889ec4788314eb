//! Telegram delivery for status and error notifications.
//!
//! Transient network failures are retried in place with exponential backoff
//! and jitter; Telegram flood control is tolerated as a non-fatal "not
//! delivered" outcome so the poll loop never stalls on it.

use crate::config::{
    TELEGRAM_API_INITIAL_BACKOFF_MS, TELEGRAM_API_MAX_BACKOFF_MS, TELEGRAM_API_MAX_RETRIES,
};
use crate::error::BotError;
use async_trait::async_trait;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use teloxide::RequestError;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::{info, warn};

/// Message delivery seam between the poll loop and the transport.
#[async_trait]
pub trait Notify: Send + Sync {
    /// Delivers `text` to the configured destination.
    ///
    /// Returns `Ok(true)` when delivered, `Ok(false)` when the transport
    /// refused delivery with a tolerated conflict.
    ///
    /// # Errors
    ///
    /// `BotError::Notify` on any other delivery failure.
    async fn send(&self, text: &str) -> Result<bool, BotError>;
}

/// Notifier backed by the Telegram Bot API.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    /// Creates a notifier for one destination chat.
    #[must_use]
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    async fn send_with_retry(&self, text: &str) -> Result<(), RequestError> {
        let strategy = ExponentialBackoff::from_millis(TELEGRAM_API_INITIAL_BACKOFF_MS)
            .max_delay(Duration::from_millis(TELEGRAM_API_MAX_BACKOFF_MS))
            .map(jitter)
            .take(TELEGRAM_API_MAX_RETRIES);

        RetryIf::spawn(
            strategy,
            || async {
                self.bot
                    .send_message(self.chat_id, text.to_owned())
                    .await
                    .map(|_| ())
            },
            |err: &RequestError| matches!(err, RequestError::Network(_)),
        )
        .await
    }
}

#[async_trait]
impl Notify for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<bool, BotError> {
        // Log every attempt regardless of outcome.
        info!("Отправка сообщения: \"{text}\"");

        match self.send_with_retry(text).await {
            Ok(()) => {
                info!("Отправлено сообщение: \"{text}\"");
                Ok(true)
            }
            Err(RequestError::RetryAfter(after)) => {
                warn!(retry_after = ?after, "чат занят, сообщение не доставлено");
                Ok(false)
            }
            Err(err) => Err(BotError::Notify(err.to_string())),
        }
    }
}
