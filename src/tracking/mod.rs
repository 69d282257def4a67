//! Tracking data and the device manager interface
//!
//! Sensor-independent half of the pipeline: the per-frame record, the joint
//! extraction both generations share, and the `DeviceManager` trait.

pub mod extract;
pub mod manager;
pub mod types;

pub use extract::{extract_first_tracked, extract_joints, JointAccumulator, TrackedJoints, TrackedSubject};
pub use manager::{DeviceManager, DeviceType, TrackingError, TrackingListener, TrackingRecord, TrackingResult};
pub use types::{JointType, Quaternion, TrackingData, Vector3};
