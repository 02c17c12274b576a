use std::{io, time::Duration};

use serde::Serialize;
use serde_json::Value;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    time::{Instant, timeout_at},
};

use crate::{
    TransportError,
    codec::{decode_prefix, encode_line, trailing_len},
};

/// Bytes requested from the stream per read.
pub const READ_CHUNK_SIZE: usize = 1024;

/// Result of one bounded attempt to read a JSON document.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// A complete document arrived after `elapsed`.
    Decoded { value: Value, elapsed: Duration },
    /// The budget ran out first; `elapsed` equals the budget.
    TimedOut { elapsed: Duration },
}

impl DecodeOutcome {
    pub fn elapsed(&self) -> Duration {
        match self {
            DecodeOutcome::Decoded { elapsed, .. } | DecodeOutcome::TimedOut { elapsed } => {
                *elapsed
            }
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            DecodeOutcome::Decoded { value, .. } => Some(value),
            DecodeOutcome::TimedOut { .. } => None,
        }
    }
}

/// Byte stream that reads and writes whole JSON documents.
///
/// Incoming bytes are accumulated until they form a complete JSON value;
/// there is no other framing. Outgoing messages are terminated by `\n`.
pub struct FramedChannel<S> {
    stream: S,
    buffer: Vec<u8>,
}

impl<S> FramedChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: Vec::with_capacity(READ_CHUNK_SIZE),
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Releases the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Waits up to `limit` for one complete JSON document.
    ///
    /// Returns as soon as the buffered bytes begin with a complete document,
    /// even if more bytes are queued. Incomplete or malformed input keeps
    /// accumulating until the deadline. Bytes following the decoded document,
    /// and everything buffered when the deadline passes, are discarded.
    /// End of stream is reported as an I/O error.
    pub async fn read_json(&mut self, limit: Duration) -> Result<DecodeOutcome, TransportError> {
        let started = Instant::now();
        let deadline = started + limit;
        let mut chunk = [0_u8; READ_CHUNK_SIZE];
        self.buffer.clear();

        while Instant::now() < deadline {
            let read = match timeout_at(deadline, self.stream.read(&mut chunk)).await {
                Ok(read) => read?,
                Err(_) => break,
            };

            if read == 0 {
                self.buffer.clear();
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "serial stream closed while awaiting json",
                )
                .into());
            }

            self.buffer.extend_from_slice(&chunk[..read]);
            tracing::trace!(read, buffered = self.buffer.len(), "received bytes");

            if let Some((value, used)) = decode_prefix(&self.buffer) {
                let discarded = trailing_len(&self.buffer[used..]);
                if discarded > 0 {
                    tracing::warn!(discarded, "dropping bytes queued after decoded json");
                }
                self.buffer.clear();

                return Ok(DecodeOutcome::Decoded {
                    value,
                    elapsed: started.elapsed().min(limit),
                });
            }
        }

        if !self.buffer.is_empty() {
            tracing::debug!(
                discarded = self.buffer.len(),
                "read deadline passed with undecoded bytes"
            );
        }
        self.buffer.clear();

        Ok(DecodeOutcome::TimedOut { elapsed: limit })
    }

    /// Writes one message as a JSON line and flushes it.
    ///
    /// Returns the number of bytes written, newline included.
    pub async fn write_json<T: Serialize>(&mut self, message: &T) -> Result<usize, TransportError> {
        let line = encode_line(message)?;
        self.stream.write_all(&line).await?;
        self.stream.flush().await?;
        tracing::trace!(bytes = line.len(), "wrote json line");
        Ok(line.len())
    }
}
