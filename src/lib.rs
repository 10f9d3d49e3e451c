//! aivengers-mcp
//!
//! An MCP server that bridges an agent to the AGIverse action backend.
//!
//! # Overview
//!
//! The bridge advertises two tools over a stdio JSON-RPC channel and turns
//! each invocation into exactly one HTTP request:
//! - `search_tools` - `GET /api/v1/actions/search`, 10 second budget
//! - `call_tool` - `POST /api/v1/actions/call`, 60 second budget
//!
//! Malformed invocations are rejected as protocol errors without touching the
//! network. Backend failures come back as ordinary text results prefixed with
//! `Error searching actions:` or `Error calling action:` so the calling agent
//! can read them and react.
//!
//! # Quick Start
//!
//! ```rust
//! use aivengers_mcp::testing::MockBackend;
//! use aivengers_mcp::{Dispatcher, ToolRegistry};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let backend = Arc::new(MockBackend::responding(json!([{"name": "get-weather"}])));
//! let dispatcher = Dispatcher::new(Arc::new(ToolRegistry::new()), backend);
//!
//! let arguments = json!({"query": "weather api"}).as_object().cloned().unwrap();
//! let result = dispatcher.dispatch("search_tools", arguments).await.unwrap();
//! assert_eq!(result.text_content(), Some(r#"[{"name":"get-weather"}]"#));
//! # });
//! ```

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod observability;
pub mod protocol;
pub mod server;
pub mod testing;
pub mod tools;
pub mod transport;

pub use backend::{ActionBackend, BackendError, CallAction, HttpBackend};
pub use config::{BackendConfig, ConfigError};
pub use dispatch::Dispatcher;
pub use error::{BridgeError, BridgeResult};
pub use protocol::{Content, ToolDescriptor, ToolInvocation, ToolResult};
pub use server::ChannelEndpoint;
pub use tools::{ToolKind, ToolRegistry};
