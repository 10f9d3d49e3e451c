//! Tool invocation dispatcher
//!
//! Routes a tool name to its handler, checks required arguments and calls the
//! backend. Failures fall into two classes:
//!
//! - malformed invocations (unknown tool, missing required argument) are
//!   returned as `Err(BridgeError)` and reach the client as protocol errors,
//!   without any network traffic;
//! - backend failures (transport, non-2xx, timeout, undecodable body) become
//!   an ordinary `ToolResult` whose text reads `"{label}: {cause}"`.

use crate::backend::{ActionBackend, BackendError};
use crate::error::{BridgeError, BridgeResult};
use crate::protocol::ToolResult;
use crate::tool_span;
use crate::tools::{builtin, ToolKind, ToolRegistry};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Dispatcher shared by all in-flight invocations
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    backend: Arc<dyn ActionBackend>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, backend: Arc<dyn ActionBackend>) -> Self {
        Self { registry, backend }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute one tool invocation.
    ///
    /// Every invocation that passes validation makes exactly one backend call
    /// and yields exactly one `ToolResult`.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> BridgeResult<ToolResult> {
        let invocation_id = Uuid::new_v4();
        let span = tool_span!(tool = %name, invocation_id = %invocation_id);

        async move {
            let kind = self.registry.resolve(name).ok_or_else(|| {
                info!("Rejected invocation of unknown tool");
                BridgeError::UnknownTool(name.to_string())
            })?;

            let outcome = match kind {
                ToolKind::SearchActions => {
                    builtin::search::validate(&arguments).map_err(rejected)?;
                    self.backend.search(&arguments).await
                }
                ToolKind::CallAction => {
                    let request = builtin::call::parse(&arguments).map_err(rejected)?;
                    self.backend.call(&request).await
                }
            };

            Ok(into_tool_result(kind, outcome))
        }
        .instrument(span)
        .await
    }
}

fn rejected(error: BridgeError) -> BridgeError {
    info!(error = %error, "Rejected malformed invocation");
    error
}

/// Map a backend outcome to the client-visible result (pure function)
pub fn into_tool_result(kind: ToolKind, outcome: Result<Value, BackendError>) -> ToolResult {
    match outcome {
        Ok(body) => ToolResult::text(body.to_string()),
        Err(error) => {
            warn!(error = %error, "Backend request failed");
            ToolResult::text(format!("{}: {error}", kind.failure_label()))
        }
    }
}
