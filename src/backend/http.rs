//! HTTP backend implementation
//!
//! Issues the search and call requests against the configured origin using a
//! shared `reqwest` client. Each request carries its own total timeout.

use crate::backend::{
    search_query_pairs, ActionBackend, BackendError, CallAction, CALL_PATH, SEARCH_PATH,
};
use crate::config::BackendConfig;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Request body of the action call endpoint
#[derive(Serialize)]
struct CallActionBody<'a> {
    #[serde(rename = "apiKey", skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
    #[serde(flatten)]
    request: &'a CallAction,
}

/// Backend reached over HTTP
pub struct HttpBackend {
    config: Arc<BackendConfig>,
    client: Client,
}

impl HttpBackend {
    /// Create a new HTTP backend
    pub fn new(config: Arc<BackendConfig>) -> Result<Self, BackendError> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Map a reqwest failure, reporting timeouts with the budget that expired
    fn classify(error: reqwest::Error, timeout: Duration) -> BackendError {
        if error.is_timeout() {
            BackendError::Timeout(timeout)
        } else {
            BackendError::Http(error)
        }
    }

    /// Reject non-2xx statuses, then decode the body as JSON
    async fn read_json(response: Response, timeout: Duration) -> Result<Value, BackendError> {
        let response = response.error_for_status()?;
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::classify(e, timeout))?;

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ActionBackend for HttpBackend {
    async fn search(&self, arguments: &Map<String, Value>) -> Result<Value, BackendError> {
        let url = self.config.endpoint(SEARCH_PATH)?;
        let timeout = self.config.search_timeout;
        debug!(url = %url, "Searching actions");

        let response = self
            .client
            .get(url)
            .query(&search_query_pairs(arguments))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::classify(e, timeout))?;

        debug!(status = %response.status(), "Search response received");
        Self::read_json(response, timeout).await
    }

    async fn call(&self, request: &CallAction) -> Result<Value, BackendError> {
        let url = self.config.endpoint(CALL_PATH)?;
        let timeout = self.config.call_timeout;
        debug!(url = %url, action = %request.action, "Calling action");

        let body = CallActionBody {
            api_key: self.config.api_key.as_deref(),
            request,
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::classify(e, timeout))?;

        debug!(status = %response.status(), "Call response received");
        Self::read_json(response, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_body_includes_api_key_when_configured() {
        let request = CallAction {
            action: "get-weather".to_string(),
            payload: Some(json!({"city": "NYC"})),
            payment: Some(json!(0.5)),
        };
        let body = CallActionBody {
            api_key: Some("key-123"),
            request: &request,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "apiKey": "key-123",
                "action": "get-weather",
                "payload": {"city": "NYC"},
                "payment": 0.5
            })
        );
    }

    #[test]
    fn test_call_body_omits_missing_api_key() {
        let request = CallAction {
            action: "get-weather".to_string(),
            payload: None,
            payment: None,
        };
        let body = CallActionBody {
            api_key: None,
            request: &request,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"action": "get-weather"})
        );
    }

    #[test]
    fn test_backend_keeps_config() {
        let config = Arc::new(BackendConfig::new(Some("key".to_string())));
        let backend = HttpBackend::new(config).unwrap();
        assert!(backend.config().has_api_key());
        assert_eq!(backend.config().origin, "https://backend.agiverse.io");
    }
}
