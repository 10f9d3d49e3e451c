//! Error types for the MCP bridge
//!
//! `BridgeError` covers invocation-contract and protocol violations: the
//! failures the client must treat as "my request was invalid". Each variant
//! maps to a JSON-RPC error code for the channel. Backend failures are not
//! represented here; they travel as `backend::BackendError` and end up as
//! ordinary tool result content.

use crate::protocol::messages::{error_codes, JsonRpcError};
use thiserror::Error;

/// Main error type for bridge operations
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Missing {0}")]
    MissingArgument(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid params: {message}")]
    InvalidParams { message: String },

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Server not initialized")]
    NotInitialized,

    #[error("Server already initialized")]
    AlreadyInitialized,

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BridgeError {
    /// Convert to the JSON-RPC error object sent back on the channel
    pub fn to_rpc_error(&self) -> JsonRpcError {
        let code = match self {
            BridgeError::MissingArgument(_)
            | BridgeError::UnknownTool(_)
            | BridgeError::InvalidParams { .. } => error_codes::INVALID_PARAMS,
            BridgeError::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            BridgeError::InvalidRequest { .. }
            | BridgeError::NotInitialized
            | BridgeError::AlreadyInitialized => error_codes::INVALID_REQUEST,
            BridgeError::Parse { .. } => error_codes::PARSE_ERROR,
            BridgeError::Internal { .. } => error_codes::INTERNAL_ERROR,
        };

        JsonRpcError::new(code, self.to_string())
    }

    /// True for malformed invocations: missing required argument or unknown tool
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            BridgeError::MissingArgument(_)
                | BridgeError::UnknownTool(_)
                | BridgeError::InvalidParams { .. }
        )
    }

    /// Create missing argument error
    pub fn missing_argument<S: Into<String>>(name: S) -> Self {
        Self::MissingArgument(name.into())
    }

    /// Create invalid params error
    pub fn invalid_params<S: Into<String>>(message: S) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Create invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create internal error
    pub fn internal_error<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;
