//! Observability for the MCP bridge
//!
//! Structured logging to stderr; stdout is reserved for the channel.

pub mod logging;

pub use logging::{init_logging, init_logging_with_verbosity, LogFormat};

// Span macros for structured logging
pub use logging::{rpc_span, tool_span};
