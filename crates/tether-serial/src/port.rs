use std::time::Duration;

use tokio_serial::{SerialPortBuilderExt, SerialStream};

use crate::{RpcSession, Timeouts, TransportError};

/// Baud rate used when none is configured.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
/// Low-level read timeout applied to opened ports.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Settings for opening a port and running calls over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub baud_rate: u32,
    pub read_timeout: Duration,
    pub timeouts: Timeouts,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
            timeouts: Timeouts::default(),
        }
    }
}

/// Outcome of trying to open one enumerated port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortProbe {
    pub name: String,
    /// Why the port could not be opened, if it could not.
    pub error: Option<String>,
}

impl PortProbe {
    pub fn is_available(&self) -> bool {
        self.error.is_none()
    }
}

/// Opens `path` as an async serial stream.
///
/// Must be called from within a tokio runtime.
pub fn open(path: &str, config: &SessionConfig) -> Result<SerialStream, TransportError> {
    let stream = tokio_serial::new(path, config.baud_rate)
        .timeout(config.read_timeout)
        .open_native_async()?;
    tracing::debug!(
        port = path,
        baud_rate = config.baud_rate,
        read_timeout_ms = config.read_timeout.as_millis(),
        "opened serial port"
    );
    Ok(stream)
}

/// Opens `path` and wraps it in a session using the configured budgets.
pub fn connect(
    path: &str,
    config: &SessionConfig,
) -> Result<RpcSession<SerialStream>, TransportError> {
    Ok(RpcSession::new(open(path, config)?, config.timeouts))
}

/// Enumerates serial ports and checks whether each can be opened.
///
/// Each probe opens and immediately closes the port.
pub fn probe_ports(baud_rate: u32) -> Result<Vec<PortProbe>, TransportError> {
    let ports = tokio_serial::available_ports()?;

    Ok(ports
        .into_iter()
        .map(|info| {
            let error = tokio_serial::new(&info.port_name, baud_rate)
                .open()
                .err()
                .map(|err| err.to_string());
            if let Some(error) = &error {
                tracing::debug!(port = %info.port_name, %error, "port probe failed");
            }
            PortProbe {
                name: info.port_name,
                error,
            }
        })
        .collect())
}
