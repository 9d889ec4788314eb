//! Homework status formatting.
//!
//! Maps a review status code to its human-readable verdict and renders the
//! notification text for a single homework record.

use crate::error::BotError;
use serde_json::Value;
use std::collections::HashMap;

/// Review status codes and their verdict texts.
const VERDICTS: &[(&str, &str)] = &[
    ("approved", "Работа проверена: ревьюеру всё понравилось. Ура!"),
    ("reviewing", "Работа взята на проверку ревьюером."),
    ("rejected", "Работа проверена: у ревьюера есть замечания."),
];

/// Fixed verdict mapping, built once at startup and injected into the poll
/// loop rather than referenced as an ambient global.
pub struct VerdictTable {
    verdicts: HashMap<&'static str, &'static str>,
}

impl Default for VerdictTable {
    fn default() -> Self {
        Self {
            verdicts: VERDICTS.iter().copied().collect(),
        }
    }
}

impl VerdictTable {
    /// Renders the status-change message for one homework record.
    ///
    /// # Errors
    ///
    /// `BotError::MissingField` when the record has no `homework_name`
    /// string, `BotError::UnknownStatus` when its status is outside the
    /// verdict table.
    pub fn format_status(&self, homework: &Value) -> Result<String, BotError> {
        let name = homework
            .get("homework_name")
            .and_then(Value::as_str)
            .ok_or(BotError::MissingField)?;

        let status = homework
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let verdict = self
            .verdicts
            .get(status)
            .ok_or_else(|| BotError::UnknownStatus(status.to_string()))?;

        Ok(format!(
            "Изменился статус проверки работы \"{name}\". {verdict}"
        ))
    }
}
