//! Serial port link implementation

use super::{LinkError, SensorLink};
use serde::{Deserialize, Serialize};
use serialport::SerialPort;
use std::io::Read;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, trace, warn};

/// Serial link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialLinkConfig {
    /// Port name (e.g., COM3, /dev/ttyUSB0)
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Per-line read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Wait after a successful open, in milliseconds. Opening the port
    /// resets the ESP32, so the first lines only arrive after it reboots.
    pub settle_delay_ms: u64,
}

impl SerialLinkConfig {
    /// Create a new configuration with default timing
    pub fn new(port: &str, baud_rate: u32) -> Self {
        Self {
            port: port.to_string(),
            baud_rate,
            read_timeout_ms: 1000,
            settle_delay_ms: 2000,
        }
    }

    /// Set the per-line read timeout
    #[must_use]
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.read_timeout_ms = ms;
        self
    }

    /// Set the post-open settle delay
    #[must_use]
    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.settle_delay_ms = ms;
        self
    }
}

impl Default for SerialLinkConfig {
    fn default() -> Self {
        Self::new("/dev/ttyUSB0", 115_200)
    }
}

/// Serial link owning the one physical port handle
///
/// State machine: `Closed --open:success--> Open`,
/// `Closed --open:failure--> Closed`, `Open --close--> Closed`.
pub struct SerialLink {
    config: SerialLinkConfig,
    port: Option<Box<dyn SerialPort>>,
    /// Bytes received after the last newline, carried between calls so a
    /// partial line is not lost when the timeout fires mid-line
    carry: Vec<u8>,
}

impl SerialLink {
    /// Create a closed link; the port is opened lazily on first use
    pub fn new(config: SerialLinkConfig) -> Self {
        Self {
            config,
            port: None,
            carry: Vec::new(),
        }
    }

    /// Borrow the configuration
    pub fn config(&self) -> &SerialLinkConfig {
        &self.config
    }
}

impl SensorLink for SerialLink {
    fn ensure_open(&mut self) -> Result<(), LinkError> {
        if self.port.is_some() {
            return Ok(());
        }

        let port = serialport::new(&self.config.port, self.config.baud_rate)
            .timeout(Duration::from_millis(self.config.read_timeout_ms))
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => {
                    LinkError::PortNotFound(self.config.port.clone())
                }
                serialport::ErrorKind::Io(io_kind) => match io_kind {
                    std::io::ErrorKind::PermissionDenied => {
                        LinkError::PermissionDenied(self.config.port.clone())
                    }
                    _ => LinkError::OpenFailed {
                        port: self.config.port.clone(),
                        reason: e.to_string(),
                    },
                },
                _ => LinkError::OpenFailed {
                    port: self.config.port.clone(),
                    reason: e.to_string(),
                },
            })?;

        // The open itself resets the device; give it time to reboot before
        // the first read sees anything but boot noise.
        thread::sleep(Duration::from_millis(self.config.settle_delay_ms));

        info!(
            port = %self.config.port,
            baud = self.config.baud_rate,
            "serial link open"
        );
        self.carry.clear();
        self.port = Some(port);
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, LinkError> {
        // A full line may already be buffered from a previous read.
        if let Some(line) = take_line(&mut self.carry) {
            return Ok(Some(line));
        }

        let Some(port) = self.port.as_mut() else {
            return Err(LinkError::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "link is closed",
            )));
        };

        let deadline = Instant::now() + Duration::from_millis(self.config.read_timeout_ms);
        let mut buf = [0u8; 256];
        loop {
            match port.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(n) => {
                    self.carry.extend_from_slice(&buf[..n]);
                    if let Some(line) = take_line(&mut self.carry) {
                        trace!(len = line.len(), "line received");
                        return Ok(Some(line));
                    }
                    // Data is flowing but no newline yet; give up after one
                    // timeout's worth so a single call stays bounded.
                    if Instant::now() >= deadline {
                        return Ok(None);
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    // Timeout: no complete line this round. Partial bytes
                    // stay in the carry buffer for the next call.
                    return Ok(None);
                }
                Err(e) => {
                    warn!(error = %e, "serial read failed");
                    return Err(LinkError::Io(e));
                }
            }
        }
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            info!(port = %self.config.port, "serial link closed");
        }
        self.carry.clear();
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn describe(&self) -> String {
        format!("{} @ {} baud", self.config.port, self.config.baud_rate)
    }
}

/// Pop one complete line (everything up to the first `\n`, exclusive) off
/// the front of `carry`, decoding it permissively.
fn take_line(carry: &mut Vec<u8>) -> Option<String> {
    let pos = carry.iter().position(|&b| b == b'\n')?;
    let line: Vec<u8> = carry.drain(..=pos).collect();
    Some(decode_dropping_invalid(&line[..line.len() - 1]))
}

/// Decode bytes as UTF-8, dropping invalid sequences rather than aborting
/// the read. The glove occasionally garbles a byte during its boot burst.
fn decode_dropping_invalid(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect()
}

/// List serial ports visible on this machine
pub fn list_ports() -> Result<Vec<serialport::SerialPortInfo>, LinkError> {
    serialport::available_ports().map_err(|e| LinkError::Io(e.into()))
}
