//! Body API surface (Kinect for Xbox One)

use crate::capture::events::{FrameHandler, SubscriptionId};
use crate::capture::replay::ReplaySensor;
use crate::tracking::{JointType, Quaternion, TrackedSubject, TrackingResult, Vector3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingState {
    NotTracked,
    Inferred,
    #[default]
    Tracked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyJoint {
    pub joint_type: JointType,
    pub position: Vector3,
    #[serde(default)]
    pub tracking_state: TrackingState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JointOrientation {
    pub joint_type: JointType,
    pub orientation: Quaternion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    pub is_tracked: bool,
    #[serde(default)]
    pub tracking_id: u64,
    #[serde(default)]
    pub joints: Vec<BodyJoint>,
    #[serde(default)]
    pub joint_orientations: Vec<JointOrientation>,
}

impl TrackedSubject for Body {
    fn is_tracked(&self) -> bool {
        self.is_tracked
    }

    fn joints(&self) -> impl Iterator<Item = (JointType, Vector3)> + '_ {
        self.joints.iter().map(|j| (j.joint_type, j.position))
    }

    fn orientation(&self, joint: JointType) -> Quaternion {
        match self.joint_orientations.iter().find(|o| o.joint_type == joint) {
            Some(o) => o.orientation,
            None => {
                tracing::trace!("No joint orientation for {:?}, using identity", joint);
                Quaternion::default()
            }
        }
    }
}

/// One body frame. Slots the SDK has not filled are `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodyFrame {
    #[serde(default)]
    pub bodies: Vec<Option<Body>>,
}

impl BodyFrame {
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

pub trait BodySensor: Send + Sync {
    fn name(&self) -> String;

    fn is_available(&self) -> bool;

    fn open(&self) -> TrackingResult<()>;

    fn close(&self);

    fn is_open(&self) -> bool;

    /// Register a frame-arrived handler on the sensor's body reader
    fn subscribe(&self, handler: FrameHandler<BodyFrame>) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

pub trait BodySensorProvider: Send + Sync {
    /// The default sensor, if any is attached
    fn default_sensor(&self) -> Option<Arc<dyn BodySensor>>;
}

impl BodySensor for ReplaySensor<BodyFrame> {
    fn name(&self) -> String {
        ReplaySensor::name(self).to_string()
    }

    fn is_available(&self) -> bool {
        self.frame_count() > 0
    }

    fn open(&self) -> TrackingResult<()> {
        self.start_stream()
    }

    fn close(&self) {
        self.stop_stream()
    }

    fn is_open(&self) -> bool {
        self.is_streaming()
    }

    fn subscribe(&self, handler: FrameHandler<BodyFrame>) -> SubscriptionId {
        ReplaySensor::subscribe(self, handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        ReplaySensor::unsubscribe(self, id)
    }
}

#[derive(Default, Clone)]
pub struct StaticBodyProvider {
    sensor: Option<Arc<dyn BodySensor>>,
}

impl StaticBodyProvider {
    pub fn new(sensor: Arc<dyn BodySensor>) -> Self {
        Self { sensor: Some(sensor) }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl BodySensorProvider for StaticBodyProvider {
    fn default_sensor(&self) -> Option<Arc<dyn BodySensor>> {
        self.sensor.clone()
    }
}
