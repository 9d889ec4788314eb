//! Canonical error kinds for the watcher.
//!
//! The poll loop distinguishes the fatal startup failure (`Config`) from the
//! recoverable per-cycle failures; everything recoverable is reported to the
//! chat and the loop continues.

use thiserror::Error;

/// Request parameters attached to API errors for diagnostics.
///
/// Deliberately excludes the authorization header so error text can be
/// logged and relayed to the chat as-is.
#[derive(Debug, Clone)]
pub struct RequestParams {
    /// Target endpoint URL.
    pub url: String,
    /// `from_date` query value used for the request.
    pub from_date: i64,
}

impl std::fmt::Display for RequestParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "url: {}, from_date: {}", self.url, self.from_date)
    }
}

/// Errors produced during startup or a poll cycle.
#[derive(Debug, Error)]
pub enum BotError {
    /// Missing or malformed startup configuration. Fatal: the process never
    /// enters the poll loop.
    #[error("{0}")]
    Config(String),

    /// Transport-level failure reaching the API (network, DNS, timeout).
    #[error("Ошибка подключения к API: {source}\n {params}")]
    Connection {
        /// Underlying transport error.
        source: reqwest::Error,
        /// Request parameters for diagnostics.
        params: RequestParams,
    },

    /// The API answered with a non-200 HTTP status.
    #[error("Ошибка при запросе к API: {status}\n {params}")]
    StatusCode {
        /// HTTP status returned by the server.
        status: reqwest::StatusCode,
        /// Request parameters for diagnostics.
        params: RequestParams,
    },

    /// Soft error signalled inside a 200 payload via an `error`/`code` key.
    #[error("Ошибка в респонсе: {detail}\n {key}\n {params}")]
    Response {
        /// Which of the soft-error keys was present.
        key: &'static str,
        /// Value stored under that key.
        detail: String,
        /// Request parameters for diagnostics.
        params: RequestParams,
    },

    /// The response structure does not match the expected shape.
    #[error("{0}")]
    Shape(&'static str),

    /// A homework record is missing the `homework_name` field.
    #[error("Не найден ключ \"homework_name\"")]
    MissingField,

    /// A homework record carries a status outside the verdict table.
    #[error("Неизвестный статус: {0}")]
    UnknownStatus(String),

    /// Failure to deliver a Telegram message.
    #[error("Ошибка при отправке сообщения: {0}")]
    Notify(String),
}
