//! MCP channel endpoint
//!
//! Speaks the host protocol on a framed duplex stream: negotiates
//! capabilities once, answers `tools/list` from the registry and relays
//! `tools/call` to the dispatcher. Each tool call runs as its own task, so
//! responses may be written in a different order than requests arrived; the
//! JSON-RPC id correlates them.

use crate::dispatch::Dispatcher;
use crate::error::BridgeError;
use crate::protocol::{
    methods, negotiate_protocol_version, CancelledParams, Implementation, InitializeParams,
    InitializeResult, JsonRpcRequest, JsonRpcResponse, ListToolsResult, RequestId,
    ServerCapabilities, ToolInvocation,
};
use crate::rpc_span;
use crate::transport::{LineReader, LineWriter, MessageHandler, TransportError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::{self, AbortHandle, JoinError, JoinSet};
use tracing::{debug, error, info, warn};

/// Per-connection negotiation state
#[derive(Debug, Default)]
struct Session {
    initialized: bool,
}

/// Tool calls still awaiting their backend response.
///
/// Request ids are unique among in-flight calls; each task id maps back to
/// the request it answers.
#[derive(Default)]
struct InFlight {
    tasks: JoinSet<JsonRpcResponse>,
    handles: HashMap<RequestId, AbortHandle>,
    requests: HashMap<task::Id, RequestId>,
}

impl InFlight {
    fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn contains(&self, id: &RequestId) -> bool {
        self.handles.contains_key(id)
    }

    fn track(&mut self, id: RequestId, handle: AbortHandle) {
        self.requests.insert(handle.id(), id.clone());
        self.handles.insert(id, handle);
    }

    fn cancel(&mut self, id: &RequestId) -> bool {
        match self.handles.remove(id) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Forget a joined task, returning the request it was serving
    fn finished(&mut self, task_id: task::Id) -> Option<RequestId> {
        let id = self.requests.remove(&task_id)?;
        // A cancelled call's id may already belong to a newer call.
        if self
            .handles
            .get(&id)
            .is_some_and(|handle| handle.id() == task_id)
        {
            self.handles.remove(&id);
        }
        Some(id)
    }

    /// Response owed for a task that ended without producing one.
    ///
    /// Cancelled calls are owed nothing; a panicked call still gets exactly
    /// one error response.
    fn failed(&mut self, error: JoinError) -> Option<JsonRpcResponse> {
        let id = self.finished(error.id());
        if error.is_cancelled() {
            debug!("Tool call cancelled");
            return None;
        }

        error!(error = %error, "Tool call task failed");
        let id = id?;
        Some(JsonRpcResponse::failure(
            Some(id),
            BridgeError::internal_error("tool call failed unexpectedly").to_rpc_error(),
        ))
    }
}

/// Endpoint serving one client connection
pub struct ChannelEndpoint {
    dispatcher: Dispatcher,
    server_info: Implementation,
}

impl ChannelEndpoint {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            server_info: Implementation::server(),
        }
    }

    pub fn server_info(&self) -> &Implementation {
        &self.server_info
    }

    /// Serve the channel until the inbound stream closes.
    ///
    /// Only channel I/O failures end the loop early. Calls still in flight
    /// when the stream closes are abandoned without a response.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), TransportError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = LineReader::new(reader);
        let mut writer = LineWriter::new(writer);
        let mut session = Session::default();
        let mut in_flight = InFlight::default();

        info!(
            server = %self.server_info.name,
            version = %self.server_info.version,
            "Channel endpoint ready"
        );

        loop {
            tokio::select! {
                line = reader.recv() => {
                    let Some(line) = line? else {
                        debug!("Inbound stream closed");
                        break;
                    };
                    if let Some(response) = self.handle_line(&line, &mut session, &mut in_flight) {
                        writer.send(&response).await?;
                    }
                }
                Some(joined) = in_flight.tasks.join_next_with_id(), if !in_flight.is_empty() => {
                    let response = match joined {
                        Ok((task_id, response)) => {
                            in_flight.finished(task_id);
                            Some(response)
                        }
                        Err(e) => in_flight.failed(e),
                    };
                    if let Some(response) = response {
                        writer.send(&response).await?;
                    }
                }
            }
        }

        if !in_flight.is_empty() {
            warn!(
                pending = in_flight.tasks.len(),
                "Abandoning in-flight tool calls"
            );
        }
        in_flight.tasks.abort_all();
        Ok(())
    }

    /// Parse and route one inbound line; returns an immediate response if any
    fn handle_line(
        &self,
        line: &[u8],
        session: &mut Session,
        in_flight: &mut InFlight,
    ) -> Option<JsonRpcResponse> {
        match MessageHandler::parse_line(line) {
            Ok(request) => self.handle_request(request, session, in_flight),
            Err(response) => {
                warn!("Rejected unparseable message");
                Some(response)
            }
        }
    }

    fn handle_request(
        &self,
        request: JsonRpcRequest,
        session: &mut Session,
        in_flight: &mut InFlight,
    ) -> Option<JsonRpcResponse> {
        let span = rpc_span!(method = %request.method);
        let _guard = span.enter();

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request, in_flight);
            return None;
        };

        let outcome = match request.method.as_str() {
            methods::INITIALIZE => self.initialize(request.params, session),
            methods::PING => Ok(Value::Object(Default::default())),
            methods::TOOLS_LIST => self.list_tools(session),
            methods::TOOLS_CALL => {
                match self.start_tool_call(id.clone(), request.params, session, in_flight) {
                    Ok(()) => return None,
                    Err(e) => Err(e),
                }
            }
            other => Err(BridgeError::MethodNotFound(other.to_string())),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(Some(id), result),
            Err(e) => {
                debug!(error = %e, "Request rejected");
                JsonRpcResponse::failure(Some(id), e.to_rpc_error())
            }
        })
    }

    fn handle_notification(&self, request: &JsonRpcRequest, in_flight: &mut InFlight) {
        match request.method.as_str() {
            methods::INITIALIZED => debug!("Client finished initialization"),
            methods::CANCELLED => {
                match parse_params::<CancelledParams>(request.params.clone()) {
                    Ok(params) => {
                        if in_flight.cancel(&params.request_id) {
                            info!(request_id = %params.request_id, "Cancelled tool call");
                        }
                    }
                    Err(e) => debug!(error = %e, "Ignoring malformed cancellation"),
                }
            }
            other => debug!(method = %other, "Ignoring notification"),
        }
    }

    fn initialize(
        &self,
        params: Option<Value>,
        session: &mut Session,
    ) -> Result<Value, BridgeError> {
        if session.initialized {
            return Err(BridgeError::AlreadyInitialized);
        }

        let params: InitializeParams = match params {
            Some(params) => parse_params(Some(params))?,
            None => InitializeParams::default(),
        };

        let result = InitializeResult {
            protocol_version: negotiate_protocol_version(params.protocol_version.as_deref())
                .to_string(),
            capabilities: ServerCapabilities::default(),
            server_info: self.server_info.clone(),
        };

        info!(
            client = ?params.client_info.as_ref().map(|c| c.name.as_str()),
            protocol_version = %result.protocol_version,
            "Capability negotiation complete"
        );

        session.initialized = true;
        to_result(&result)
    }

    fn list_tools(&self, session: &Session) -> Result<Value, BridgeError> {
        ensure_initialized(session)?;
        to_result(&ListToolsResult {
            tools: self.dispatcher.registry().list_tools(),
        })
    }

    /// Spawn the dispatcher for one call; its response is written when it joins
    fn start_tool_call(
        &self,
        id: RequestId,
        params: Option<Value>,
        session: &Session,
        in_flight: &mut InFlight,
    ) -> Result<(), BridgeError> {
        ensure_initialized(session)?;
        if in_flight.contains(&id) {
            return Err(BridgeError::invalid_request(format!(
                "request id {id} is already in flight"
            )));
        }
        let invocation: ToolInvocation = parse_params(params)?;
        let (name, arguments) = invocation.into_parts();

        let dispatcher = self.dispatcher.clone();
        let response_id = id.clone();
        let handle = in_flight.tasks.spawn(async move {
            match dispatcher.dispatch(&name, arguments).await {
                Ok(result) => match serde_json::to_value(&result) {
                    Ok(value) => JsonRpcResponse::success(Some(response_id), value),
                    Err(e) => JsonRpcResponse::failure(
                        Some(response_id),
                        BridgeError::internal_error(e.to_string()).to_rpc_error(),
                    ),
                },
                Err(e) => JsonRpcResponse::failure(Some(response_id), e.to_rpc_error()),
            }
        });
        in_flight.track(id, handle);
        Ok(())
    }
}

fn ensure_initialized(session: &Session) -> Result<(), BridgeError> {
    if session.initialized {
        Ok(())
    } else {
        Err(BridgeError::NotInitialized)
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, BridgeError> {
    let params = params.ok_or_else(|| BridgeError::invalid_params("missing params"))?;
    serde_json::from_value(params).map_err(|e| BridgeError::invalid_params(e.to_string()))
}

fn to_result<T: Serialize>(result: &T) -> Result<Value, BridgeError> {
    serde_json::to_value(result).map_err(|e| BridgeError::internal_error(e.to_string()))
}
