//! Mock implementations for testing
//!
//! Provides a mock `ActionBackend` that records every request it receives, so
//! tests can assert how many network calls an invocation would have made.

use crate::backend::{ActionBackend, BackendError, CallAction};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// What the mock backend answers with
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Successful JSON body
    Respond(Value),
    /// Total timeout expired
    Timeout(Duration),
    /// Body that is not valid JSON
    MalformedBody(String),
}

/// Mock backend for testing
#[derive(Debug, Clone)]
pub struct MockBackend {
    pub outcome: MockOutcome,
    /// Delay applied to search requests before answering
    pub search_delay: Option<Duration>,
    pub search_requests: Arc<Mutex<Vec<Map<String, Value>>>>,
    pub call_requests: Arc<Mutex<Vec<CallAction>>>,
}

impl MockBackend {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            search_delay: None,
            search_requests: Arc::new(Mutex::new(Vec::new())),
            call_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn responding(body: Value) -> Self {
        Self::new(MockOutcome::Respond(body))
    }

    pub fn timing_out(after: Duration) -> Self {
        Self::new(MockOutcome::Timeout(after))
    }

    pub fn malformed<S: Into<String>>(body: S) -> Self {
        Self::new(MockOutcome::MalformedBody(body.into()))
    }

    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = Some(delay);
        self
    }

    pub async fn get_search_requests(&self) -> Vec<Map<String, Value>> {
        self.search_requests.lock().await.clone()
    }

    pub async fn get_call_requests(&self) -> Vec<CallAction> {
        self.call_requests.lock().await.clone()
    }

    /// Total number of backend requests made
    pub async fn request_count(&self) -> usize {
        self.search_requests.lock().await.len() + self.call_requests.lock().await.len()
    }

    fn answer(&self) -> Result<Value, BackendError> {
        match &self.outcome {
            MockOutcome::Respond(body) => Ok(body.clone()),
            MockOutcome::Timeout(after) => Err(BackendError::Timeout(*after)),
            MockOutcome::MalformedBody(body) => Ok(serde_json::from_str(body)?),
        }
    }
}

#[async_trait]
impl ActionBackend for MockBackend {
    async fn search(&self, arguments: &Map<String, Value>) -> Result<Value, BackendError> {
        self.search_requests.lock().await.push(arguments.clone());
        if let Some(delay) = self.search_delay {
            tokio::time::sleep(delay).await;
        }
        self.answer()
    }

    async fn call(&self, request: &CallAction) -> Result<Value, BackendError> {
        self.call_requests.lock().await.push(request.clone());
        self.answer()
    }
}
