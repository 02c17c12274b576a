use std::time::Duration;

use thiserror::Error;

/// Transport failures for a serial JSON-RPC call.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Underlying stream I/O error, including the port closing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serial port could not be enumerated or opened.
    #[error("serial port error: {0}")]
    Port(#[from] tokio_serial::Error),
    /// Request encoding failed.
    #[error("failed to encode json payload: {0}")]
    Encode(String),
    /// No complete JSON response arrived within the request budget.
    #[error("no response within {:.2} sec", .waited.as_secs_f64())]
    Timeout { waited: Duration },
}
