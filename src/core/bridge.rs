//! Sensor bridge: the process-wide entry point guarding the serial link
//!
//! All physical-channel access is serialized through one mutex. A frame
//! attempt holds the lock from the open check to the outcome, and `close`
//! takes the same lock, so a shutdown cannot race an in-flight read.

use crate::core::frame::{read_frame, ReadOutcome};
use crate::core::link::{LinkError, SensorLink, SerialLink, SerialLinkConfig};
use parking_lot::Mutex;
use tracing::info;

/// Shared bridge between concurrent callers and the single serial link
pub struct SensorBridge {
    link: Mutex<Box<dyn SensorLink>>,
    line_bound: usize,
}

impl SensorBridge {
    /// Create a bridge over the real serial port
    pub fn new(config: SerialLinkConfig, line_bound: usize) -> Self {
        Self::with_link(Box::new(SerialLink::new(config)), line_bound)
    }

    /// Create a bridge over any link implementation
    pub fn with_link(link: Box<dyn SensorLink>, line_bound: usize) -> Self {
        Self {
            link: Mutex::new(link),
            line_bound,
        }
    }

    /// Acquire the link, ensure it is open, and attempt one frame.
    ///
    /// Open failures are non-fatal: the link stays closed and the next call
    /// retries the open. Concurrent callers queue on the internal mutex and
    /// are served one at a time, so no two attempts interleave line reads.
    pub fn latest_reading(&self) -> Result<ReadOutcome, LinkError> {
        let mut link = self.link.lock();
        link.ensure_open()?;
        read_frame(link.as_mut(), self.line_bound)
    }

    /// Close the link. Idempotent; never fails. Waits for an in-flight
    /// attempt to finish because it takes the same lock as reads.
    pub fn close(&self) {
        let mut link = self.link.lock();
        if link.is_open() {
            info!("closing {}", link.describe());
        }
        link.close();
    }

    /// Whether the underlying link is currently open. A held lock means an
    /// attempt is in flight, which implies the link is open or opening.
    pub fn is_open(&self) -> bool {
        self.link.try_lock().map_or(true, |link| link.is_open())
    }
}
