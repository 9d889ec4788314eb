//! API Client Contract Tests
//!
//! These tests verify exact HTTP format compliance for the homework-status
//! client: request format (auth header, cursor query), status-code mapping,
//! soft-error detection inside 200 payloads, and transport-failure mapping.

use practicum_watcher::api::ApiClient;
use practicum_watcher::config::Settings;
use practicum_watcher::error::BotError;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(uri: &str) -> Settings {
    Settings {
        practicum_token: "test-oauth-token".to_string(),
        telegram_token: String::new(),
        telegram_chat_id: String::new(),
        practicum_endpoint: format!("{uri}/api/user_api/homework_statuses/"),
    }
}

#[tokio::test]
async fn test_request_carries_auth_header_and_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user_api/homework_statuses/"))
        .and(header("Authorization", "OAuth test-oauth-token"))
        .and(query_param("from_date", "1700000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "homeworks": [],
            "current_date": 1_700_000_100
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&settings_for(&mock_server.uri()));
    let payload = client
        .fetch_statuses(1_700_000_000)
        .await
        .expect("request should succeed");

    assert_eq!(payload["current_date"], 1_700_000_100);
}

#[tokio::test]
async fn test_non_200_status_is_reported_with_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user_api/homework_statuses/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&settings_for(&mock_server.uri()));
    let err = client
        .fetch_statuses(42)
        .await
        .expect_err("503 must be an error");

    match &err {
        BotError::StatusCode { status, params } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(params.from_date, 42);
            assert!(params.url.contains("/api/user_api/homework_statuses/"));
        }
        other => panic!("expected StatusCode error, got {other:?}"),
    }

    // Diagnostics end up in the rendered message, the secret does not.
    let text = err.to_string();
    assert!(text.contains("from_date: 42"));
    assert!(!text.contains("test-oauth-token"));
}

#[tokio::test]
async fn test_soft_error_key_in_200_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user_api/homework_statuses/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"error": "Wrong from_date format"},
            "code": "invalid_request"
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&settings_for(&mock_server.uri()));
    let err = client
        .fetch_statuses(0)
        .await
        .expect_err("soft error must be surfaced");

    match err {
        BotError::Response { key, detail, .. } => {
            assert_eq!(key, "error");
            assert!(detail.contains("Wrong from_date format"));
        }
        other => panic!("expected Response error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_code_key_alone_is_a_soft_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user_api/homework_statuses/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": "not_authenticated"})),
        )
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&settings_for(&mock_server.uri()));
    let err = client
        .fetch_statuses(0)
        .await
        .expect_err("code key must be surfaced");

    assert!(matches!(err, BotError::Response { key: "code", .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_a_connection_error() {
    // Nothing listens on the discard port.
    let client = ApiClient::new(&settings_for("http://127.0.0.1:9"));
    let err = client
        .fetch_statuses(0)
        .await
        .expect_err("refused connection must be an error");

    assert!(matches!(err, BotError::Connection { .. }));
}

#[tokio::test]
async fn test_payload_is_passed_through_untouched() {
    let mock_server = MockServer::start().await;

    let body = json!({
        "homeworks": [
            {"homework_name": "hw05", "status": "reviewing"},
            {"homework_name": "hw04", "status": "approved"}
        ],
        "current_date": 1_700_000_000
    });

    Mock::given(method("GET"))
        .and(path("/api/user_api/homework_statuses/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&settings_for(&mock_server.uri()));
    let payload = client.fetch_statuses(0).await.expect("request should succeed");

    assert_eq!(payload, body);
}
