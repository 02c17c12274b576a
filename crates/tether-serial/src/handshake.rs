use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{DecodeOutcome, FramedChannel, TransportError};

/// Unsolicited message a device printed after the port was opened.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    /// Decoded banner document, uninterpreted.
    pub message: Value,
    /// Time from the start of the handshake until the banner decoded.
    pub waited: Duration,
}

/// Drains the boot banner a freshly reset device emits.
///
/// Opening a serial port usually resets the board, which prints a startup
/// message before accepting commands. Waits up to `init_timeout` for one
/// JSON document. No banner, or one that never parses, yields `Ok(None)`;
/// only I/O failures are errors.
pub async fn await_ready<S>(
    channel: &mut FramedChannel<S>,
    init_timeout: Duration,
) -> Result<Option<Banner>, TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match channel.read_json(init_timeout).await? {
        DecodeOutcome::Decoded { value, elapsed } => {
            tracing::debug!(waited_ms = elapsed.as_millis(), "device banner received");
            Ok(Some(Banner {
                message: value,
                waited: elapsed,
            }))
        }
        DecodeOutcome::TimedOut { elapsed } => {
            tracing::debug!(waited_ms = elapsed.as_millis(), "no device banner");
            Ok(None)
        }
    }
}
