//! Backend client abstraction
//!
//! One outbound request per tool invocation. The backend reports its outcome
//! as an explicit `Result`; deciding what the client sees is left to the
//! dispatcher.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

pub mod http;

pub use http::HttpBackend;

/// Action search endpoint
pub const SEARCH_PATH: &str = "/api/v1/actions/search";

/// Action call endpoint
pub const CALL_PATH: &str = "/api/v1/actions/call";

/// Backend failure. Its `Display` is the cause shown to the client.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON in response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// A validated action call, before the API key is attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallAction {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Value>,
}

/// Remote service that searches and executes actions
#[async_trait]
pub trait ActionBackend: Send + Sync {
    /// Search actions; `arguments` are sent verbatim as query parameters
    async fn search(&self, arguments: &Map<String, Value>) -> Result<Value, BackendError>;

    /// Execute an action
    async fn call(&self, request: &CallAction) -> Result<Value, BackendError>;
}

/// Flatten invocation arguments into query pairs (pure function).
///
/// Strings are sent as-is, numbers and booleans in their JSON text form,
/// arrays and objects JSON-encoded; nulls are dropped.
pub fn search_query_pairs(arguments: &Map<String, Value>) -> Vec<(String, String)> {
    arguments
        .iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), rendered))
        })
        .collect()
}
