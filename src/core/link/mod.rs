//! Link layer owning the physical serial channel
//!
//! The accumulator and bridge talk to the device through the [`SensorLink`]
//! trait so they can be exercised against scripted fakes in tests; the one
//! real implementation is [`SerialLink`].

mod serial;

pub use serial::{list_ports, SerialLink, SerialLinkConfig};

use std::io;
use thiserror::Error;

/// Link error types
#[derive(Error, Debug)]
pub enum LinkError {
    /// Port not found
    #[error("Port not found: {0}")]
    PortNotFound(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Opening the port failed for some other reason
    #[error("Failed to open {port}: {reason}")]
    OpenFailed {
        /// Configured port identifier
        port: String,
        /// Underlying error text
        reason: String,
    },

    /// I/O error while reading
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl LinkError {
    /// Whether the error came from opening the port rather than reading it.
    ///
    /// Open failures are never fatal: the link stays closed and the next
    /// call retries the open with the same configuration.
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            Self::PortNotFound(_) | Self::PermissionDenied(_) | Self::OpenFailed { .. }
        )
    }
}

/// Access to the device's line-oriented serial channel.
///
/// `read_line` semantics: `Ok(Some(line))` for one complete decoded line,
/// `Ok(None)` when the per-line timeout fired or no full line has arrived
/// yet, `Err` only for real I/O failures.
#[cfg_attr(test, mockall::automock)]
pub trait SensorLink: Send {
    /// Open the channel if it is not already open. Idempotent: an open link
    /// is returned as-is without reopening.
    fn ensure_open(&mut self) -> Result<(), LinkError>;

    /// Blocking read of one line with the configured per-line timeout.
    fn read_line(&mut self) -> Result<Option<String>, LinkError>;

    /// Close the channel if open. Idempotent; never fails.
    fn close(&mut self);

    /// Whether the physical handle is currently open.
    fn is_open(&self) -> bool;

    /// Human-readable connection description.
    fn describe(&self) -> String;
}
