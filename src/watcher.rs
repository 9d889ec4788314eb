//! Poll loop that watches homework statuses and relays notifications.
//!
//! The watcher owns the two pieces of in-memory state: the timestamp cursor
//! marking the next query window, and the text of the last delivered error
//! notification used to suppress duplicate alerts. The cursor advances only
//! after a fully successful cycle, so a failed cycle re-queries the same
//! window on the next attempt.

use crate::api::ApiClient;
use crate::config::get_retry_period_secs;
use crate::error::BotError;
use crate::notify::Notify;
use crate::response::extract_homeworks;
use crate::status::VerdictTable;
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Orchestrator for the fetch → validate → format → notify cycle.
pub struct Watcher {
    api: ApiClient,
    notifier: Box<dyn Notify>,
    verdicts: VerdictTable,
    cursor: i64,
    last_error: Option<String>,
    retry_period: Duration,
}

impl Watcher {
    /// Creates a watcher starting its query window at `cursor`.
    #[must_use]
    pub fn new(api: ApiClient, notifier: Box<dyn Notify>, cursor: i64) -> Self {
        Self {
            api,
            notifier,
            verdicts: VerdictTable::default(),
            cursor,
            last_error: None,
            retry_period: Duration::from_secs(get_retry_period_secs()),
        }
    }

    /// Overrides the inter-cycle sleep period.
    #[must_use]
    pub fn with_retry_period(mut self, period: Duration) -> Self {
        self.retry_period = period;
        self
    }

    /// Current query-window start.
    #[must_use]
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Runs the poll loop until `shutdown` is cancelled.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!(
            cursor = self.cursor,
            period_secs = self.retry_period.as_secs(),
            "запуск цикла опроса"
        );

        loop {
            self.poll_once().await;

            tokio::select! {
                () = shutdown.cancelled() => {
                    info!("получен сигнал завершения, выход из цикла опроса");
                    break;
                }
                () = tokio::time::sleep(self.retry_period) => {}
            }
        }
    }

    /// Executes one poll pass, reporting any failure without propagating it.
    pub async fn poll_once(&mut self) {
        if let Err(err) = self.run_cycle().await {
            self.report_cycle_error(&err).await;
        }
    }

    /// One fetch → validate → format → notify pass.
    ///
    /// Advances the cursor only when every step succeeded.
    async fn run_cycle(&mut self) -> Result<(), BotError> {
        let response = self.api.fetch_statuses(self.cursor).await?;
        let homeworks = extract_homeworks(&response)?;

        if let Some(latest) = homeworks.first() {
            let message = self.verdicts.format_status(latest)?;
            self.notifier.send(&message).await?;
        } else {
            debug!("нет обновлений за период");
        }

        self.cursor = next_cursor(&response, self.cursor);
        Ok(())
    }

    /// Reports a cycle failure to the log and, best-effort, to the chat.
    ///
    /// A repeat of the last delivered error text is suppressed. Failures of
    /// the reporting path itself are only logged; the loop must survive them.
    async fn report_cycle_error(&mut self, err: &BotError) {
        let message = format!("Сбой в работе программы: {err}");
        error!("{message}");

        if self.last_error.as_deref() == Some(message.as_str()) {
            debug!("повтор прежней ошибки, уведомление не отправляется");
            return;
        }

        match self.notifier.send(&message).await {
            Ok(true) => self.last_error = Some(message),
            Ok(false) => {}
            Err(notify_err) => warn!("{notify_err}"),
        }
    }
}

/// Next cursor value: the server-reported `current_date`, or the previous
/// one when the field is absent or not an integer.
fn next_cursor(response: &Value, previous: i64) -> i64 {
    response
        .get("current_date")
        .and_then(Value::as_i64)
        .unwrap_or(previous)
}
