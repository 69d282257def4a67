//! Device manager trait
//!
//! Defines the interface shared by the sensor generations (legacy skeleton
//! API, modern body API) and the record they publish to.

use crate::tracking::extract::TrackedJoints;
use crate::tracking::types::TrackingData;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while tracking
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Sensor error: {0}")]
    SensorError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Replay error at line {line}: {source}")]
    ReplayError {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Result type for tracking operations
pub type TrackingResult<T> = Result<T, TrackingError>;

/// Consumer of accepted frames. Runs on the sensor's frame thread.
pub type TrackingListener = Arc<dyn Fn(TrackingData) + Send + Sync>;

/// Sensor generations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Skeleton API (Kinect for Xbox 360)
    Legacy,
    /// Body API (Kinect for Xbox One)
    #[default]
    Modern,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceType::Legacy => write!(f, "legacy"),
            DeviceType::Modern => write!(f, "modern"),
        }
    }
}

impl std::str::FromStr for DeviceType {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" | "360" | "xbox360" => Ok(DeviceType::Legacy),
            "modern" | "one" | "xboxone" => Ok(DeviceType::Modern),
            other => Err(TrackingError::ConfigurationError(format!(
                "unknown device type '{}' (expected legacy or modern)",
                other
            ))),
        }
    }
}

/// Trait for device managers
///
/// Each manager owns at most one active sensor connection and turns its
/// per-frame callback into `TrackingData` notifications.
pub trait DeviceManager: Send {
    fn device_type(&self) -> DeviceType;

    /// Register the consumer of new tracking data, replacing any previous one
    fn set_listener(&mut self, listener: TrackingListener);

    /// Whether a sensor is present without starting it
    fn is_available(&self) -> bool;

    /// Acquire the first available sensor and start streaming
    ///
    /// Any running session is stopped first. A successful return does not
    /// guarantee an active stream; check `is_started`.
    fn start(&mut self) -> TrackingResult<()>;

    /// Release the sensor. Returns whether a session was running.
    fn stop(&mut self) -> bool;

    fn is_started(&self) -> bool;

    /// Whether the held sensor is still delivering frames
    ///
    /// Drops to false when the device goes away (or a recording runs out)
    /// while the session is still started.
    fn is_streaming(&self) -> bool;

    /// Copy of the last accepted frame's values
    fn tracking_data(&self) -> TrackingData;
}

/// Tracking record owned by a manager and shared with its frame callback
#[derive(Default)]
pub struct TrackingRecord {
    data: Mutex<TrackingData>,
    listener: RwLock<Option<TrackingListener>>,
}

impl TrackingRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_listener(&self, listener: TrackingListener) {
        *self.listener.write() = Some(listener);
    }

    pub fn snapshot(&self) -> TrackingData {
        *self.data.lock()
    }

    /// Write a complete joint set into the record and notify the listener once
    pub fn publish(&self, joints: &TrackedJoints) {
        let snapshot = {
            let mut data = self.data.lock();
            joints.apply_to(&mut data);
            *data
        };

        if let Some(listener) = self.listener.read().as_ref() {
            listener(snapshot);
        }
    }
}
