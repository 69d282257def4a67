use crate::tracking::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};

/// How the remote places a controller relative to the headset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadRelation {
    /// Position is used as-is
    Unrelated,
    /// Position is already relative to the head
    IsInHeadSpace,
    /// Position follows the head; only orientation is tracked independently
    SticksToHead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandType {
    Left,
    Right,
}

impl HandType {
    /// Controller slot on the remote: 0 for left, 1 for right
    pub fn controller_index(self) -> u8 {
        match self {
            HandType::Left => 0,
            HandType::Right => 1,
        }
    }
}

impl std::fmt::Display for HandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandType::Left => write!(f, "left"),
            HandType::Right => write!(f, "right"),
        }
    }
}

/// Full pose and input record for one controller
///
/// Analog axes and buttons are carried for the remote's benefit; no input is
/// mapped, so they are always zero/false.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerState {
    pub controller_id: u8,
    pub head_relation: HeadRelation,
    pub suggested_hand: HandType,
    pub orientation: Quaternion,
    pub position: Option<Vector3>,
    pub analog_x: f64,
    pub analog_y: f64,
    pub analog_trigger: f64,
    pub is_menu_pressed: bool,
    pub is_system_pressed: bool,
    pub is_trigger_pressed: bool,
    pub is_grip_pressed: bool,
    pub is_touchpad_pressed: bool,
    pub is_touchpad_touched: bool,
}

impl ControllerState {
    /// Pose-only state for a hand, all inputs released
    pub fn pose(hand: HandType, orientation: Quaternion, position: Option<Vector3>) -> Self {
        Self {
            controller_id: hand.controller_index(),
            head_relation: HeadRelation::SticksToHead,
            suggested_hand: hand,
            orientation,
            position,
            analog_x: 0.0,
            analog_y: 0.0,
            analog_trigger: 0.0,
            is_menu_pressed: false,
            is_system_pressed: false,
            is_trigger_pressed: false,
            is_grip_pressed: false,
            is_touchpad_pressed: false,
            is_touchpad_touched: false,
        }
    }
}
