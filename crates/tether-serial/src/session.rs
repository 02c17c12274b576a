use std::time::Duration;

use serde_json::Value;
use tether_core::JsonRpcRequest;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{Banner, DecodeOutcome, FramedChannel, TransportError, await_ready};

const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Independent budgets for the two waits of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// How long to wait for a boot banner after opening the port.
    pub init: Duration,
    /// How long a ready device may take to answer a request.
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            init: DEFAULT_INIT_TIMEOUT,
            request: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Phases a session passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Opened,
    AwaitingBanner,
    Sending,
    AwaitingResponse,
    Completed,
    TimedOut,
}

/// Successful call result.
#[derive(Debug, Clone, PartialEq)]
pub struct CallReport {
    /// Decoded response document.
    pub response: Value,
    /// Time between the request write returning and the response decoding.
    pub waited: Duration,
}

/// Runs JSON-RPC calls over one exclusively owned stream.
///
/// The first call drains the device's boot banner before sending; later
/// calls on the same session go straight to sending. Dropping the session
/// closes the stream.
pub struct RpcSession<S> {
    channel: FramedChannel<S>,
    timeouts: Timeouts,
    state: SessionState,
    history: Vec<SessionState>,
    banner: Option<Banner>,
    bytes_written: Option<usize>,
}

impl<S> RpcSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a freshly opened stream.
    pub fn new(stream: S, timeouts: Timeouts) -> Self {
        Self {
            channel: FramedChannel::new(stream),
            timeouts,
            state: SessionState::Opened,
            history: vec![SessionState::Opened],
            banner: None,
            bytes_written: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every state entered so far, oldest first.
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    /// Banner drained during the handshake, if the device sent one.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Size of the most recent request line, newline included.
    pub fn bytes_written(&self) -> Option<usize> {
        self.bytes_written
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Releases the underlying stream.
    pub fn into_inner(self) -> S {
        self.channel.into_inner()
    }

    /// Sends one request and waits for one JSON document in reply.
    ///
    /// The reply is returned as decoded, without checking its shape. A
    /// missing or mismatched `id` is logged, not rejected. A reply that does
    /// not arrive within the request budget is a [`TransportError::Timeout`];
    /// there are no retries.
    pub async fn call(&mut self, request: &JsonRpcRequest) -> Result<CallReport, TransportError> {
        if self.state == SessionState::Opened {
            self.transition(SessionState::AwaitingBanner);
            self.banner = await_ready(&mut self.channel, self.timeouts.init).await?;
        }

        self.transition(SessionState::Sending);
        let written = self.channel.write_json(request).await?;
        self.bytes_written = Some(written);
        tracing::debug!(
            method = request.method(),
            id = request.id().0,
            bytes = written,
            "request sent"
        );

        self.transition(SessionState::AwaitingResponse);
        match self.channel.read_json(self.timeouts.request).await? {
            DecodeOutcome::Decoded { value, elapsed } => {
                self.transition(SessionState::Completed);
                warn_on_id_mismatch(request, &value);
                Ok(CallReport {
                    response: value,
                    waited: elapsed,
                })
            }
            DecodeOutcome::TimedOut { elapsed } => {
                self.transition(SessionState::TimedOut);
                Err(TransportError::Timeout { waited: elapsed })
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = ?self.state, to = ?next, "session state");
        self.state = next;
        self.history.push(next);
    }
}

/// Runs a single call on a freshly opened stream.
pub async fn call<S>(
    stream: S,
    request: &JsonRpcRequest,
    timeouts: Timeouts,
) -> Result<CallReport, TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    RpcSession::new(stream, timeouts).call(request).await
}

fn warn_on_id_mismatch(request: &JsonRpcRequest, response: &Value) {
    let expected = request.id().0;
    match response.get("id") {
        Some(id) if id.as_u64() == Some(expected) => {}
        Some(id) => {
            tracing::warn!(expected, actual = %id, "response id does not match request");
        }
        None => tracing::warn!(expected, "response carries no id"),
    }
}
