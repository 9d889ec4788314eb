//! Client for the Practicum homework-status API.
//!
//! A single GET endpoint answered with JSON. Besides HTTP-level failures the
//! server signals application errors inside a 200 payload via an `error` or
//! `code` key, which this client surfaces as a distinct error kind.

use crate::config::{get_api_http_timeout_secs, Settings};
use crate::error::{BotError, RequestParams};
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Keys the API uses to signal a soft error inside a 200 payload.
const SOFT_ERROR_KEYS: [&str; 2] = ["error", "code"];

/// Creates an HTTP client configured with the standard API timeout.
///
/// Uses `API_HTTP_TIMEOUT_SECS` environment variable or 30s default.
/// This prevents infinite hangs when the API is slow or unresponsive.
#[must_use]
pub fn create_http_client() -> HttpClient {
    let timeout = Duration::from_secs(get_api_http_timeout_secs());
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}

/// Client for the homework-status endpoint.
///
/// Holds the OAuth credential read once at startup; the credential is only
/// ever attached to the outbound request header, never to errors or logs.
pub struct ApiClient {
    http: HttpClient,
    endpoint: String,
    token: String,
}

impl ApiClient {
    /// Build a client from the loaded settings.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: create_http_client(),
            endpoint: settings.practicum_endpoint.clone(),
            token: settings.practicum_token.clone(),
        }
    }

    fn params(&self, from_date: i64) -> RequestParams {
        RequestParams {
            url: self.endpoint.clone(),
            from_date,
        }
    }

    /// Fetch homework statuses changed since `from_date`.
    ///
    /// # Errors
    ///
    /// `BotError::Connection` on transport failure, `BotError::StatusCode`
    /// on a non-200 answer, `BotError::Response` when the payload carries a
    /// soft-error key.
    pub async fn fetch_statuses(&self, from_date: i64) -> Result<Value, BotError> {
        debug!(from_date, "запрос статусов домашних работ");

        let response = self
            .http
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|source| BotError::Connection {
                source,
                params: self.params(from_date),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(BotError::StatusCode {
                status,
                params: self.params(from_date),
            });
        }

        let payload: Value = response.json().await.map_err(|source| BotError::Connection {
            source,
            params: self.params(from_date),
        })?;

        if let Some((key, detail)) = soft_error(&payload) {
            return Err(BotError::Response {
                key,
                detail,
                params: self.params(from_date),
            });
        }

        Ok(payload)
    }
}

/// Returns the first soft-error key present in the payload and its value.
fn soft_error(payload: &Value) -> Option<(&'static str, String)> {
    SOFT_ERROR_KEYS
        .iter()
        .find_map(|&key| payload.get(key).map(|value| (key, value.to_string())))
}
