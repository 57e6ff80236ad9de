//! # Glovebridge Core Library
//!
//! Bridges an ESP32 sensor glove emitting line-oriented telegrams over a
//! serial port to callers that want the latest complete multi-sensor reading:
//! - Serial link lifecycle (lazy open, post-open settle delay, idempotent close)
//! - Line-protocol frame accumulator and per-channel payload parser
//! - Mutex-guarded bridge so concurrent callers never interleave reads
//! - HTTP service layer (`/read`, `/save`) and CSV dataset recording
//!
//! ## Example
//!
//! ```rust,no_run
//! use glovebridge::{ReadStatus, SensorBridge, SerialLinkConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = SerialLinkConfig::new("/dev/ttyUSB0", 115_200);
//!     let bridge = SensorBridge::new(config, 20);
//!
//!     let outcome = bridge.latest_reading()?;
//!     if outcome.status == ReadStatus::Complete {
//!         println!("flex: {:?}", outcome.reading.flex);
//!     }
//!
//!     bridge.close();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod core;
pub mod server;

// Re-exports for convenience
pub use crate::config::BridgeConfig;
pub use crate::core::bridge::SensorBridge;
pub use crate::core::frame::{Channel, ReadOutcome, ReadStatus, Reading};
pub use crate::core::link::{LinkError, SensorLink, SerialLink, SerialLinkConfig};
pub use crate::core::recorder::{CsvRecorder, RecordError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
