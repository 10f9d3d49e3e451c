//! MCP protocol message types
//!
//! This module implements the JSON-RPC 2.0 envelope and the MCP structures
//! exchanged over the stdio channel.

pub mod messages;

pub use messages::*;
