//! Kinect for Xbox 360 (skeleton API)

pub mod manager;
pub mod sdk;

pub use manager::Kinect360Manager;
pub use sdk::{SkeletonFrame, SkeletonSensor, SkeletonSensorProvider, SmoothingParameters, StaticSkeletonProvider};
