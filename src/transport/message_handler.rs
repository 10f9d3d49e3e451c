//! Pure message parsing and formatting for the JSON-RPC channel

use crate::error::BridgeError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, RequestId, JSONRPC_VERSION};
use serde_json::Value;

/// Pure message routing helpers
pub struct MessageHandler;

impl MessageHandler {
    /// Decode and parse one raw inbound line (pure function).
    ///
    /// A line that is not UTF-8 is a parse error like any other malformed
    /// input; it never fails the channel.
    pub fn parse_line(line: &[u8]) -> Result<JsonRpcRequest, JsonRpcResponse> {
        let line = std::str::from_utf8(line).map_err(|e| {
            JsonRpcResponse::failure(
                None,
                BridgeError::parse(format!("line is not valid UTF-8: {e}")).to_rpc_error(),
            )
        })?;
        Self::parse_request(line)
    }

    /// Parse one inbound line (pure function).
    ///
    /// On failure returns the error response to send back, carrying the
    /// request id whenever it could be recovered.
    pub fn parse_request(line: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
        let value: Value = serde_json::from_str(line).map_err(|e| {
            JsonRpcResponse::failure(None, BridgeError::parse(e.to_string()).to_rpc_error())
        })?;

        let id = Self::extract_id(&value);

        if value.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err(Self::invalid_request(id, "jsonrpc must be \"2.0\""));
        }

        serde_json::from_value::<JsonRpcRequest>(value)
            .map_err(|e| Self::invalid_request(id, &e.to_string()))
    }

    /// Serialize an outbound response (pure function)
    pub fn format_response(response: &JsonRpcResponse) -> Result<String, serde_json::Error> {
        serde_json::to_string(response)
    }

    fn extract_id(value: &Value) -> Option<RequestId> {
        value
            .get("id")
            .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok())
    }

    fn invalid_request(id: Option<RequestId>, message: &str) -> JsonRpcResponse {
        JsonRpcResponse::failure(id, BridgeError::invalid_request(message).to_rpc_error())
    }
}
