//! Integration tests for the HTTP backend client
//!
//! Tests the wire contract with the backend:
//! - search arguments become query parameters verbatim
//! - call requests carry the API key, action, payload and payment
//! - non-2xx statuses, undecodable bodies and stalls surface as errors


use aivengers_mcp::backend::{ActionBackend, BackendError, CallAction};
use aivengers_mcp::config::BackendConfig;
use aivengers_mcp::HttpBackend;
use reqwest::StatusCode;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use test_helpers::{arguments, backend_config};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(config: BackendConfig) -> HttpBackend {
    HttpBackend::new(Arc::new(config)).unwrap()
}

fn call_action(action: &str) -> CallAction {
    CallAction {
        action: action.to_string(),
        payload: None,
        payment: None,
    }
}

#[tokio::test]
async fn test_search_sends_arguments_as_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/actions/search"))
        .and(query_param("query", "weather api"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "get-weather"}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend(backend_config(&mock_server.uri()));
    let body = backend
        .search(&arguments(json!({"query": "weather api", "limit": 10})))
        .await
        .unwrap();

    assert_eq!(body, json!([{"name": "get-weather"}]));
}

#[tokio::test]
async fn test_call_posts_api_key_and_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/actions/call"))
        .and(body_json(json!({
            "apiKey": "test-api-key",
            "action": "get-weather",
            "payload": {"city": "NYC"},
            "payment": -0.25
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"temp": 21})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend(backend_config(&mock_server.uri()));
    let body = backend
        .call(&CallAction {
            action: "get-weather".to_string(),
            payload: Some(json!({"city": "NYC"})),
            payment: Some(json!(-0.25)),
        })
        .await
        .unwrap();

    assert_eq!(body, json!({"temp": 21}));
}

#[tokio::test]
async fn test_call_without_api_key_omits_it() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/actions/call"))
        .and(body_json(json!({"action": "ping"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = BackendConfig::new(None).with_origin(mock_server.uri());
    let result = backend(config).call(&call_action("ping")).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/actions/call"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend(backend_config(&mock_server.uri()));
    let error = backend.call(&call_action("get-weather")).await.unwrap_err();

    match &error {
        BackendError::Http(inner) => {
            assert_eq!(inner.status(), Some(StatusCode::SERVICE_UNAVAILABLE))
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
    assert!(error.to_string().contains("503"));
    assert!(!error.to_string().contains("maintenance"));
}

#[tokio::test]
async fn test_client_error_status_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/actions/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "bad key"})))
        .mount(&mock_server)
        .await;

    let backend = backend(backend_config(&mock_server.uri()));
    let error = backend
        .search(&arguments(json!({"query": "x"})))
        .await
        .unwrap_err();

    assert!(matches!(error, BackendError::Http(_)));
    assert!(error.to_string().contains("401"));
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/actions/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let backend = backend(backend_config(&mock_server.uri()));
    let error = backend
        .search(&arguments(json!({"query": "x"})))
        .await
        .unwrap_err();

    assert!(matches!(error, BackendError::Decode(_)));
}

#[tokio::test]
async fn test_stalled_search_times_out_at_configured_bound() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/actions/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = backend_config(&mock_server.uri())
        .with_timeouts(Duration::from_millis(200), Duration::from_secs(60));
    let backend = backend(config);

    let started = Instant::now();
    let error = backend
        .search(&arguments(json!({"query": "x"})))
        .await
        .unwrap_err();

    assert!(matches!(error, BackendError::Timeout(d) if d == Duration::from_millis(200)));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_stalled_call_times_out_at_configured_bound() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/actions/call"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = backend_config(&mock_server.uri())
        .with_timeouts(Duration::from_secs(10), Duration::from_millis(300));
    let backend = backend(config);

    let error = backend.call(&call_action("slow")).await.unwrap_err();

    assert_eq!(error.to_string(), "request timed out after 300ms");
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let config = backend_config("http://127.0.0.1:1");
    let error = backend(config)
        .search(&arguments(json!({"query": "x"})))
        .await
        .unwrap_err();

    assert!(matches!(error, BackendError::Http(_)));
}
