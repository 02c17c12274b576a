//! Newline-framed JSON-RPC transport over serial links.
//!
//! The channel, handshake and session are generic over any tokio byte
//! stream; [`port`] opens real serial devices.

mod error;

pub mod channel;
pub mod codec;
pub mod handshake;
pub mod port;
pub mod session;

pub use channel::{DecodeOutcome, FramedChannel};
pub use error::TransportError;
pub use handshake::{Banner, await_ready};
pub use port::SessionConfig;
pub use session::{CallReport, RpcSession, SessionState, Timeouts, call};
