//! Skeleton API surface (Kinect for Xbox 360)
//!
//! Frame types and sensor traits standing in for the vendor SDK. The replay
//! driver implements them; a native binding would too.

use crate::capture::events::{FrameHandler, SubscriptionId};
use crate::capture::replay::ReplaySensor;
use crate::tracking::{JointType, Quaternion, TrackedSubject, TrackingResult, Vector3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkeletonTrackingState {
    NotTracked,
    PositionOnly,
    Tracked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkeletonJoint {
    pub joint_type: JointType,
    pub position: Vector3,
}

/// Rotation of the bone ending at `end_joint`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoneOrientation {
    pub end_joint: JointType,
    pub absolute_rotation: Quaternion,
    #[serde(default)]
    pub hierarchical_rotation: Quaternion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skeleton {
    pub tracking_state: SkeletonTrackingState,
    #[serde(default)]
    pub joints: Vec<SkeletonJoint>,
    #[serde(default)]
    pub bone_orientations: Vec<BoneOrientation>,
}

impl Skeleton {
    pub fn bone_orientation(&self, joint: JointType) -> Option<&BoneOrientation> {
        self.bone_orientations.iter().find(|b| b.end_joint == joint)
    }
}

impl TrackedSubject for Skeleton {
    fn is_tracked(&self) -> bool {
        self.tracking_state == SkeletonTrackingState::Tracked
    }

    fn joints(&self) -> impl Iterator<Item = (JointType, Vector3)> + '_ {
        self.joints.iter().map(|j| (j.joint_type, j.position))
    }

    fn orientation(&self, joint: JointType) -> Quaternion {
        match self.bone_orientation(joint) {
            Some(bone) => bone.absolute_rotation,
            None => {
                tracing::trace!("No bone orientation for {:?}, using identity", joint);
                Quaternion::default()
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkeletonFrame {
    #[serde(default)]
    pub skeletons: Vec<Skeleton>,
}

/// Joint filtering applied by the SDK when the skeleton stream is enabled
///
/// All zero disables smoothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmoothingParameters {
    pub smoothing: f32,
    pub correction: f32,
    pub prediction: f32,
    pub jitter_radius: f32,
    pub max_deviation_radius: f32,
}

pub trait SkeletonSensor: Send + Sync {
    fn name(&self) -> String;

    fn enable_skeleton_stream(&self, parameters: SmoothingParameters) -> TrackingResult<()>;

    /// Register a `SkeletonFrameReady` handler
    fn subscribe(&self, handler: FrameHandler<SkeletonFrame>) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    fn start(&self) -> TrackingResult<()>;

    /// Stop streaming and release the device
    fn stop(&self);

    /// Whether frames are still being produced
    fn is_running(&self) -> bool;
}

/// Enumerates connected sensors
pub trait SkeletonSensorProvider: Send + Sync {
    fn sensors(&self) -> Vec<Arc<dyn SkeletonSensor>>;
}

impl SkeletonSensor for ReplaySensor<SkeletonFrame> {
    fn name(&self) -> String {
        ReplaySensor::name(self).to_string()
    }

    fn enable_skeleton_stream(&self, parameters: SmoothingParameters) -> TrackingResult<()> {
        tracing::debug!(
            "Skeleton stream enabled on {} (recorded frames are already filtered, {:?})",
            ReplaySensor::name(self),
            parameters
        );
        Ok(())
    }

    fn subscribe(&self, handler: FrameHandler<SkeletonFrame>) -> SubscriptionId {
        ReplaySensor::subscribe(self, handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        ReplaySensor::unsubscribe(self, id)
    }

    fn start(&self) -> TrackingResult<()> {
        self.start_stream()
    }

    fn stop(&self) {
        self.stop_stream()
    }

    fn is_running(&self) -> bool {
        self.is_streaming()
    }
}

/// Provider over a fixed set of sensors; empty when nothing is connected
#[derive(Default, Clone)]
pub struct StaticSkeletonProvider {
    sensors: Vec<Arc<dyn SkeletonSensor>>,
}

impl StaticSkeletonProvider {
    pub fn new(sensors: Vec<Arc<dyn SkeletonSensor>>) -> Self {
        Self { sensors }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl SkeletonSensorProvider for StaticSkeletonProvider {
    fn sensors(&self) -> Vec<Arc<dyn SkeletonSensor>> {
        self.sensors.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_frame_json() {
        let json = r#"{"skeletons":[{"trackingState":"Tracked",
            "joints":[{"jointType":"Head","position":{"x":0.0,"y":0.6,"z":2.0}}],
            "boneOrientations":[{"endJoint":"HandRight","absoluteRotation":{"x":0.0,"y":0.0,"z":0.0,"w":1.0}}]}]}"#;
        let frame: SkeletonFrame = serde_json::from_str(json).unwrap();

        let skeleton = &frame.skeletons[0];
        assert!(skeleton.is_tracked());
        assert_eq!(skeleton.joints().next(), Some((JointType::Head, Vector3::new(0.0, 0.6, 2.0))));
        assert_eq!(skeleton.orientation(JointType::HandRight), Quaternion::IDENTITY);
        assert_eq!(
            skeleton.bone_orientation(JointType::HandRight).unwrap().hierarchical_rotation,
            Quaternion::IDENTITY
        );
    }

    #[test]
    fn test_position_only_is_not_tracked() {
        let skeleton = Skeleton {
            tracking_state: SkeletonTrackingState::PositionOnly,
            joints: vec![],
            bone_orientations: vec![],
        };
        assert!(!skeleton.is_tracked());
    }

    #[test]
    fn test_missing_bone_orientation_is_identity() {
        let skeleton = Skeleton {
            tracking_state: SkeletonTrackingState::Tracked,
            joints: vec![],
            bone_orientations: vec![],
        };
        assert_eq!(skeleton.orientation(JointType::HandLeft), Quaternion::IDENTITY);
    }
}
