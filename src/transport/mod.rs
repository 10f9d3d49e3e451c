//! Transport layer for the MCP channel
//!
//! The channel is line-delimited JSON-RPC over a byte stream: one JSON object
//! per line. Framing lives in `stdio`, pure message parsing and formatting in
//! `message_handler`.

use thiserror::Error;

pub mod message_handler;
pub mod stdio;

pub use message_handler::MessageHandler;
pub use stdio::{LineReader, LineWriter};

/// Failures of the channel itself. These end the serving loop.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Channel I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
}
