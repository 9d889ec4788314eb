//! Configuration and settings management
//!
//! Loads settings from environment variables and defines polling constants.

use crate::error::BotError;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Default homework-status endpoint.
pub const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Seconds between poll cycles.
pub const RETRY_PERIOD_SECS: u64 = 600;

/// Hard timeout for a single API request, in seconds.
pub const API_HTTP_TIMEOUT_SECS: u64 = 30;

/// Maximum retry attempts for a transient Telegram network failure.
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;
/// Initial backoff before the first Telegram retry, in milliseconds.
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 500;
/// Upper bound for the Telegram retry backoff, in milliseconds.
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 5_000;

/// Directory receiving the rolling log file.
pub const LOG_DIR: &str = "logs";

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Practicum API OAuth token
    #[serde(default)]
    pub practicum_token: String,

    /// Telegram Bot API token
    #[serde(default)]
    pub telegram_token: String,

    /// Telegram chat that receives notifications (raw env string)
    #[serde(default)]
    pub telegram_chat_id: String,

    /// Override for the homework-status endpoint
    #[serde(default = "default_endpoint")]
    pub practicum_endpoint: String,
}

fn default_endpoint() -> String {
    ENDPOINT.to_string()
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(File::with_name("config/default").required(false))
            // Add in a local configuration file
            // This file shouldn't be checked into git
            .add_source(File::with_name("config/local").required(false))
            // Settings from environment variables directly
            // ignore_empty treats empty env vars as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        s.try_deserialize()
    }

    /// Verifies that every required credential is present.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Config` naming the first missing token.
    pub fn check_tokens(&self) -> Result<(), BotError> {
        let required = [
            ("PRACTICUM_TOKEN", &self.practicum_token),
            ("TELEGRAM_TOKEN", &self.telegram_token),
            ("TELEGRAM_CHAT_ID", &self.telegram_chat_id),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(BotError::Config(format!("Токен {name} не найден!")));
            }
        }
        Ok(())
    }

    /// Returns the destination chat ID parsed from the raw setting.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Config` if the value is not a valid integer.
    pub fn chat_id(&self) -> Result<i64, BotError> {
        self.telegram_chat_id.trim().parse().map_err(|_| {
            BotError::Config(format!(
                "Некорректный TELEGRAM_CHAT_ID: {}",
                self.telegram_chat_id
            ))
        })
    }
}

/// Get the poll period from env or default.
///
/// Environment variable: `RETRY_PERIOD_SECS`.
#[must_use]
pub fn get_retry_period_secs() -> u64 {
    std::env::var("RETRY_PERIOD_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(RETRY_PERIOD_SECS)
}

/// Get the API request timeout from env or default.
///
/// Environment variable: `API_HTTP_TIMEOUT_SECS`.
#[must_use]
pub fn get_api_http_timeout_secs() -> u64 {
    std::env::var("API_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(API_HTTP_TIMEOUT_SECS)
}

/// Get the log directory from env or default.
///
/// Environment variable: `LOG_DIR`.
#[must_use]
pub fn get_log_dir() -> String {
    std::env::var("LOG_DIR")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| LOG_DIR.to_string())
}
