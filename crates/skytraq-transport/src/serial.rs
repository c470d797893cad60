use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::{Connector, Transport};

/// Per-read deadline used when none is configured.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Serial line settings shared by every session a [`SerialConnector`] opens.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Deadline for a single blocking read.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// An open serial port session (8N1, no flow control).
///
/// The port is closed when the stream is dropped.
pub struct SerialStream {
    port: Box<dyn SerialPort>,
    baud_rate: u32,
}

impl SerialStream {
    /// Open `path` at `baud_rate` bps.
    pub fn open(path: impl AsRef<Path>, baud_rate: u32, config: &SerialConfig) -> Result<Self> {
        let path = path.as_ref();
        let port = serialport::new(path.to_string_lossy(), baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.timeout)
            .open()
            .map_err(|source| TransportError::Open {
                path: path.to_path_buf(),
                baud_rate,
                source,
            })?;

        info!(path = %path.display(), baud_rate, "opened serial port");
        Ok(Self { port, baud_rate })
    }

    /// Baud rate this session was opened at.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

impl Transport for SerialStream {
    fn read(&mut self, n: usize) -> Result<Bytes> {
        let mut buf = vec![0u8; n];
        loop {
            match self.port.read(&mut buf) {
                Ok(read) => {
                    buf.truncate(read);
                    return Ok(Bytes::from(buf));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Ok(Bytes::new());
                }
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < data.len() {
            match self.port.write(&data[offset..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
        self.port.flush()?;
        debug!(bytes = data.len(), "wrote to serial port");
        Ok(())
    }
}

impl std::fmt::Debug for SerialStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialStream")
            .field("port", &self.port.name())
            .field("baud_rate", &self.baud_rate)
            .finish()
    }
}

/// Opens [`SerialStream`] sessions on a fixed device path.
#[derive(Debug, Clone)]
pub struct SerialConnector {
    path: PathBuf,
    config: SerialConfig,
}

impl SerialConnector {
    /// Create a connector for `path` with default settings.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, SerialConfig::default())
    }

    /// Create a connector for `path` with explicit settings.
    pub fn with_config(path: impl Into<PathBuf>, config: SerialConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// Device path this connector opens.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Connector for SerialConnector {
    type Stream = SerialStream;

    fn open(&self, baud_rate: u32) -> Result<SerialStream> {
        SerialStream::open(&self.path, baud_rate, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_device_reports_path_and_rate() {
        let connector = SerialConnector::new("/dev/skytraq-does-not-exist");
        let err = connector.open(9600).unwrap_err();
        match err {
            TransportError::Open {
                path, baud_rate, ..
            } => {
                assert_eq!(path, PathBuf::from("/dev/skytraq-does-not-exist"));
                assert_eq!(baud_rate, 9600);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn default_config_uses_one_second_deadline() {
        assert_eq!(SerialConfig::default().timeout, Duration::from_secs(1));
    }
}
