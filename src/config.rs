//! Bridge settings
//!
//! Everything has a default, so an empty `{}` file (or no file at all) gives
//! the stock setup: modern sensor, all hand channels on, UDP remote on
//! localhost.

use crate::capture::replay::{ReplayOptions, DEFAULT_FRAME_INTERVAL};
use crate::capture::xbox360::SmoothingParameters;
use crate::forwarder::SendToggles;
use crate::tracking::{DeviceType, TrackingError, TrackingResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 38219;
pub const DEFAULT_APP_NAME: &str = "Vridge.Kinect";

/// Which remote implementation receives forwarded poses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
    #[default]
    Udp,
    /// Log every call instead of sending it
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteConfig {
    pub host: String,
    pub port: u16,
    pub app_name: String,
    pub kind: RemoteKind,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            app_name: DEFAULT_APP_NAME.to_string(),
            kind: RemoteKind::Udp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplayConfig {
    pub legacy_file: Option<PathBuf>,
    pub modern_file: Option<PathBuf>,
    pub frame_interval_ms: u64,
    pub looping: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            legacy_file: None,
            modern_file: None,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL.as_millis() as u64,
            looping: false,
        }
    }
}

impl ReplayConfig {
    pub fn options(&self) -> ReplayOptions {
        ReplayOptions {
            frame_interval: Duration::from_millis(self.frame_interval_ms.max(1)),
            looping: self.looping,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    pub remote: RemoteConfig,
    pub device: DeviceType,
    pub toggles: SendToggles,
    pub replay: ReplayConfig,
    /// Joint filtering requested from the legacy sensor
    pub smoothing: SmoothingParameters,
}

impl BridgeConfig {
    pub fn load(path: &Path) -> TrackingResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content).map_err(|e| {
            TrackingError::ConfigurationError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> TrackingResult<()> {
        let data = serde_json::to_vec_pretty(self)
            .map_err(|e| TrackingError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
