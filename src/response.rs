//! Validation of the raw API response shape.

use crate::error::BotError;
use serde_json::Value;

/// Extracts the homework list from a raw API response.
///
/// The list is returned untouched; an empty list is valid and means "no
/// update this cycle".
///
/// # Errors
///
/// Returns `BotError::Shape` when the root is not an object, the
/// `homeworks` key is absent, or its value is not an array.
pub fn extract_homeworks(response: &Value) -> Result<&Vec<Value>, BotError> {
    let root = response
        .as_object()
        .ok_or(BotError::Shape("Ответ API не является словарем"))?;

    let homeworks = root
        .get("homeworks")
        .ok_or(BotError::Shape("Отсутствует ключ homeworks в ответе"))?;

    homeworks
        .as_array()
        .ok_or(BotError::Shape("Ответ не является списком"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_list_even_when_empty() {
        let response = json!({"homeworks": [], "current_date": 1});
        let homeworks = extract_homeworks(&response).expect("empty list is valid");
        assert!(homeworks.is_empty());

        let response = json!({"homeworks": [{"status": "approved"}]});
        let homeworks = extract_homeworks(&response).expect("list extracted");
        assert_eq!(homeworks.len(), 1);
    }

    #[test]
    fn test_rejects_non_object_root() {
        let err = extract_homeworks(&json!([1, 2])).expect_err("array root");
        assert_eq!(err.to_string(), "Ответ API не является словарем");
    }

    #[test]
    fn test_rejects_missing_key() {
        let err = extract_homeworks(&json!({"current_date": 1})).expect_err("no key");
        assert_eq!(err.to_string(), "Отсутствует ключ homeworks в ответе");
    }

    #[test]
    fn test_rejects_non_list_value() {
        let err = extract_homeworks(&json!({"homeworks": "nope"})).expect_err("not a list");
        assert_eq!(err.to_string(), "Ответ не является списком");
    }
}
