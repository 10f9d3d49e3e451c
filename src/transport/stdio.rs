//! Line-delimited framing over async byte streams
//!
//! Used over the process's stdin/stdout in production and over in-memory
//! duplex pipes in tests.

use crate::protocol::JsonRpcResponse;
use crate::transport::{MessageHandler, TransportError};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Reads one message per line
pub struct LineReader<R> {
    reader: BufReader<R>,
    // Holds a partial line across cancelled `recv` calls.
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            buf: Vec::new(),
        }
    }

    /// Next non-blank line as raw bytes without its terminator, or `None`
    /// once the stream is closed.
    ///
    /// Bytes are not decoded here, so a line that is not UTF-8 reaches the
    /// caller instead of failing the stream. Cancel safe: can be polled
    /// inside `tokio::select!`.
    pub async fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        loop {
            let read = self.reader.read_until(b'\n', &mut self.buf).await?;
            if read == 0 && self.buf.is_empty() {
                return Ok(None);
            }

            let mut line = std::mem::take(&mut self.buf);
            while matches!(line.last(), Some(b'\n' | b'\r')) {
                line.pop();
            }
            if !line.iter().all(u8::is_ascii_whitespace) {
                return Ok(Some(line));
            }
        }
    }
}

/// Writes one message per line, flushing after each
pub struct LineWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn send(&mut self, response: &JsonRpcResponse) -> Result<(), TransportError> {
        let mut payload = MessageHandler::format_response(response)?;
        payload.push('\n');
        self.writer.write_all(payload.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
