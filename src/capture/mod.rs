//! Sensor-generation specific capture implementations
//!
//! This module provides one device manager per Kinect generation, the SDK
//! seams they are written against, and the recorded-frame driver that
//! implements those seams.

pub mod events;
pub mod replay;
pub mod xbox360;
pub mod xbox_one;

use crate::config::ReplayConfig;
use crate::tracking::{DeviceManager, DeviceType, TrackingResult};
use std::sync::Arc;

pub use events::{FrameEvent, FrameHandler, SubscriptionId};
pub use replay::{ReplayOptions, ReplaySensor};
pub use xbox360::Kinect360Manager;
pub use xbox_one::KinectOneManager;

use xbox360::{SkeletonFrame, SkeletonSensor, SkeletonSensorProvider, SmoothingParameters, StaticSkeletonProvider};
use xbox_one::{BodyFrame, BodySensor, BodySensorProvider, StaticBodyProvider};

/// Sensor sources for both generations; builds the manager for a device type
#[derive(Clone)]
pub struct SensorProviders {
    pub legacy: Arc<dyn SkeletonSensorProvider>,
    pub modern: Arc<dyn BodySensorProvider>,
    /// Applied when the legacy skeleton stream is enabled
    pub smoothing: SmoothingParameters,
}

impl SensorProviders {
    pub fn new(legacy: Arc<dyn SkeletonSensorProvider>, modern: Arc<dyn BodySensorProvider>) -> Self {
        Self {
            legacy,
            modern,
            smoothing: SmoothingParameters::default(),
        }
    }

    pub fn with_smoothing(mut self, smoothing: SmoothingParameters) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// No sensors of either generation
    pub fn none() -> Self {
        Self::new(
            Arc::new(StaticSkeletonProvider::empty()),
            Arc::new(StaticBodyProvider::empty()),
        )
    }

    /// Replay sensors for whichever recordings are configured
    pub fn from_replay(config: &ReplayConfig) -> TrackingResult<Self> {
        let options = config.options();

        let legacy = match &config.legacy_file {
            Some(path) => {
                let sensor: ReplaySensor<SkeletonFrame> = ReplaySensor::from_file("kinect360-replay", path, options)?;
                tracing::info!("Kinect 360 replay: {:?} ({} frames)", path, sensor.frame_count());
                StaticSkeletonProvider::new(vec![Arc::new(sensor) as Arc<dyn SkeletonSensor>])
            }
            None => StaticSkeletonProvider::empty(),
        };

        let modern = match &config.modern_file {
            Some(path) => {
                let sensor: ReplaySensor<BodyFrame> = ReplaySensor::from_file("kinect-one-replay", path, options)?;
                tracing::info!("Kinect One replay: {:?} ({} frames)", path, sensor.frame_count());
                StaticBodyProvider::new(Arc::new(sensor) as Arc<dyn BodySensor>)
            }
            None => StaticBodyProvider::empty(),
        };

        Ok(Self::new(Arc::new(legacy), Arc::new(modern)))
    }

    pub fn create_manager(&self, device_type: DeviceType) -> Box<dyn DeviceManager> {
        match device_type {
            DeviceType::Legacy => Box::new(Kinect360Manager::with_smoothing(self.legacy.clone(), self.smoothing)),
            DeviceType::Modern => Box::new(KinectOneManager::new(self.modern.clone())),
        }
    }
}
