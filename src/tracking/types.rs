use serde::{Deserialize, Serialize};

/// Camera-space position in meters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    /// All components zero. Sent in place of an orientation the user chose not to forward.
    pub const ZERO: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 0.0);
    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Skeletal landmark labels shared by both sensor generations
///
/// Named after the body API. The legacy skeleton API reports 20 of these: its
/// `HipCenter`, `Spine` and `ShoulderCenter` map to `SpineBase`, `SpineMid`
/// and `SpineShoulder`. `Neck`, the hand tips and the thumbs are body API only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointType {
    SpineBase,
    SpineMid,
    Neck,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
    SpineShoulder,
    HandTipLeft,
    ThumbLeft,
    HandTipRight,
    ThumbRight,
}

/// Head position and both hand transforms of one tracked subject
///
/// Hand transforms are laid out as position (x, y, z) followed by the
/// orientation quaternion (x, y, z, w).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingData {
    pub head_position: [f32; 3],
    pub left_transform: [f32; 7],
    pub right_transform: [f32; 7],
}

impl TrackingData {
    pub fn set_head(&mut self, position: Vector3) {
        self.head_position = [position.x, position.y, position.z];
    }

    pub fn set_left(&mut self, position: Vector3, orientation: Quaternion) {
        write_transform(&mut self.left_transform, position, orientation);
    }

    pub fn set_right(&mut self, position: Vector3, orientation: Quaternion) {
        write_transform(&mut self.right_transform, position, orientation);
    }

    pub fn head(&self) -> Vector3 {
        let [x, y, z] = self.head_position;
        Vector3::new(x, y, z)
    }

    pub fn left_position(&self) -> Vector3 {
        transform_position(&self.left_transform)
    }

    pub fn left_orientation(&self) -> Quaternion {
        transform_orientation(&self.left_transform)
    }

    pub fn right_position(&self) -> Vector3 {
        transform_position(&self.right_transform)
    }

    pub fn right_orientation(&self) -> Quaternion {
        transform_orientation(&self.right_transform)
    }
}

fn write_transform(transform: &mut [f32; 7], position: Vector3, orientation: Quaternion) {
    *transform = [
        position.x,
        position.y,
        position.z,
        orientation.x,
        orientation.y,
        orientation.z,
        orientation.w,
    ];
}

fn transform_position(transform: &[f32; 7]) -> Vector3 {
    Vector3::new(transform[0], transform[1], transform[2])
}

fn transform_orientation(transform: &[f32; 7]) -> Quaternion {
    Quaternion::new(transform[3], transform[4], transform[5], transform[6])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_transform_layout() {
        let mut data = TrackingData::default();
        data.set_right(Vector3::new(1.0, 2.0, 3.0), Quaternion::new(0.1, 0.2, 0.3, 0.4));

        assert_eq!(data.right_transform, [1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 0.4]);
        assert_eq!(data.right_position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(data.right_orientation(), Quaternion::new(0.1, 0.2, 0.3, 0.4));
        // Untouched fields keep their previous values
        assert_eq!(data.left_transform, [0.0; 7]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(TrackingData::default()).unwrap();
        assert!(json.get("headPosition").is_some());
        assert!(json.get("leftTransform").is_some());
        assert!(json.get("rightTransform").is_some());
    }
}
