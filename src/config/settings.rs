//! Bridge settings persisted as TOML

use crate::core::frame::DEFAULT_LINE_BOUND;
use crate::core::link::SerialLinkConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Bridge configuration
///
/// Static for the process lifetime; there is no hot-reload. A persistently
/// wrong port shows up as a not-connected error on every call until the
/// process is restarted with a corrected config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Bound on classified lines consulted per frame attempt
    pub line_bound: usize,
    /// Serial link settings
    pub serial: SerialLinkConfig,
    /// HTTP listener settings
    pub http: HttpConfig,
    /// CSV recording settings
    pub recording: RecordingConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            line_bound: DEFAULT_LINE_BOUND,
            serial: SerialLinkConfig::default(),
            http: HttpConfig::default(),
            recording: RecordingConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Load config from file, falling back to defaults when none exists
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = super::config_dir()
            .ok_or("Could not determine config directory")?
            .join("config.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = super::config_dir()
            .ok_or("Could not determine config directory")?
            .join("config.toml");

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Address the API binds to
    pub listen: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8000)),
        }
    }
}

/// CSV recording settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Dataset file the `/save` endpoint appends to
    pub csv_path: PathBuf,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("dataset.csv"),
        }
    }
}
