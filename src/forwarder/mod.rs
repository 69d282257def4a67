//! Tracking data to VR remote mapping
//!
//! The forwarder runs on the sensor's frame thread, once per accepted frame.
//! Remote failures are logged and counted; they never reach the device
//! manager.

pub mod controller;
pub mod log;
pub mod remote;
pub mod udp;

pub use controller::{ControllerState, HandType, HeadRelation};
pub use log::LogRemote;
pub use remote::{Capabilities, ControllerRemote, HeadRemote, RemoteError, RemoteResult, VrRemote};
pub use udp::UdpRemote;

use crate::config::{RemoteConfig, RemoteKind};
use crate::tracking::{Quaternion, TrackingData, TrackingListener};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Which hand channels are sent to the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendToggles {
    pub send_left_position: bool,
    pub send_left_rotation: bool,
    pub send_right_position: bool,
    pub send_right_rotation: bool,
}

impl Default for SendToggles {
    fn default() -> Self {
        Self {
            send_left_position: true,
            send_left_rotation: true,
            send_right_position: true,
            send_right_rotation: true,
        }
    }
}

impl SendToggles {
    /// (position, rotation) toggles for a hand
    pub fn for_hand(&self, hand: HandType) -> (bool, bool) {
        match hand {
            HandType::Left => (self.send_left_position, self.send_left_rotation),
            HandType::Right => (self.send_right_position, self.send_right_rotation),
        }
    }

    pub fn set(&mut self, hand: HandType, channel: SendChannel, enabled: bool) {
        let slot = match (hand, channel) {
            (HandType::Left, SendChannel::Position) => &mut self.send_left_position,
            (HandType::Left, SendChannel::Rotation) => &mut self.send_left_rotation,
            (HandType::Right, SendChannel::Position) => &mut self.send_right_position,
            (HandType::Right, SendChannel::Rotation) => &mut self.send_right_rotation,
        };
        *slot = enabled;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendChannel {
    Position,
    Rotation,
}

/// Build the controller update for one hand, or `None` when both of its channels are off
pub fn controller_state(hand: HandType, data: &TrackingData, toggles: &SendToggles) -> Option<ControllerState> {
    let (send_position, send_rotation) = toggles.for_hand(hand);
    if !send_position && !send_rotation {
        return None;
    }

    let (position, orientation) = match hand {
        HandType::Left => (data.left_position(), data.left_orientation()),
        HandType::Right => (data.right_position(), data.right_orientation()),
    };

    Some(ControllerState::pose(
        hand,
        if send_rotation { orientation } else { Quaternion::ZERO },
        send_position.then_some(position),
    ))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardStats {
    pub frames_forwarded: u64,
    pub failed_calls: u64,
}

pub struct Forwarder {
    remote: Arc<dyn VrRemote>,
    toggles: Arc<RwLock<SendToggles>>,
    frames_forwarded: AtomicU64,
    failed_calls: AtomicU64,
}

impl Forwarder {
    pub fn new(remote: Arc<dyn VrRemote>, toggles: Arc<RwLock<SendToggles>>) -> Self {
        Self {
            remote,
            toggles,
            frames_forwarded: AtomicU64::new(0),
            failed_calls: AtomicU64::new(0),
        }
    }

    /// Remote selected by configuration, with the default capabilities
    pub fn connect_remote(config: &RemoteConfig) -> RemoteResult<Arc<dyn VrRemote>> {
        let capabilities = Capabilities::default();
        let remote: Arc<dyn VrRemote> = match config.kind {
            RemoteKind::Udp => Arc::new(UdpRemote::connect(
                &config.host,
                config.port,
                &config.app_name,
                capabilities,
            )?),
            RemoteKind::Log => Arc::new(LogRemote::new(&config.app_name, capabilities)),
        };
        Ok(remote)
    }

    pub fn toggles(&self) -> Arc<RwLock<SendToggles>> {
        self.toggles.clone()
    }

    pub fn forward(&self, data: &TrackingData) {
        let toggles = *self.toggles.read();

        if let Some(head) = self.remote.head() {
            let position = data.head();
            if let Err(e) = head.set_position(position.x, position.y, position.z) {
                self.record_failure("head position", &e);
            }
        }

        if let Some(controller) = self.remote.controller() {
            for hand in [HandType::Left, HandType::Right] {
                let Some(state) = controller_state(hand, data, &toggles) else {
                    continue;
                };
                if let Err(e) = controller.set_controller_state(&state) {
                    self.record_failure("controller state", &e);
                }
            }
        }

        self.frames_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Listener that forwards every notification from a device manager
    pub fn listener(self: &Arc<Self>) -> TrackingListener {
        let forwarder = self.clone();
        Arc::new(move |data: TrackingData| forwarder.forward(&data))
    }

    pub fn stats(&self) -> ForwardStats {
        ForwardStats {
            frames_forwarded: self.frames_forwarded.load(Ordering::Relaxed),
            failed_calls: self.failed_calls.load(Ordering::Relaxed),
        }
    }

    fn record_failure(&self, call: &str, error: &RemoteError) {
        let failed = self.failed_calls.fetch_add(1, Ordering::Relaxed) + 1;
        // Every call fails while the remote is down; keep the log readable
        if failed == 1 || failed % 100 == 0 {
            tracing::warn!("Remote {} call failed ({} failures so far): {}", call, failed, error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::Vector3;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Head(f32, f32, f32),
        Controller(ControllerState),
    }

    struct RecordingRemote {
        capabilities: Capabilities,
        calls: Mutex<Vec<Call>>,
        fail: bool,
    }

    impl RecordingRemote {
        fn new(capabilities: Capabilities) -> Self {
            Self {
                capabilities,
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(Capabilities::default())
            }
        }

        fn result(&self) -> RemoteResult<()> {
            if self.fail {
                Err(RemoteError::IoError(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "remote down",
                )))
            } else {
                Ok(())
            }
        }

        fn controller_calls(&self) -> Vec<ControllerState> {
            self.calls
                .lock()
                .iter()
                .filter_map(|call| match call {
                    Call::Controller(state) => Some(*state),
                    _ => None,
                })
                .collect()
        }
    }

    impl HeadRemote for RecordingRemote {
        fn set_position(&self, x: f32, y: f32, z: f32) -> RemoteResult<()> {
            self.calls.lock().push(Call::Head(x, y, z));
            self.result()
        }
    }

    impl ControllerRemote for RecordingRemote {
        fn set_controller_state(&self, state: &ControllerState) -> RemoteResult<()> {
            self.calls.lock().push(Call::Controller(*state));
            self.result()
        }
    }

    impl VrRemote for RecordingRemote {
        fn capabilities(&self) -> Capabilities {
            self.capabilities
        }

        fn head(&self) -> Option<&dyn HeadRemote> {
            self.capabilities
                .contains(Capabilities::HEAD_TRACKING)
                .then_some(self as &dyn HeadRemote)
        }

        fn controller(&self) -> Option<&dyn ControllerRemote> {
            self.capabilities
                .contains(Capabilities::CONTROLLERS)
                .then_some(self as &dyn ControllerRemote)
        }
    }

    fn sample_data() -> TrackingData {
        TrackingData {
            head_position: [0.0, 1.6, 2.0],
            left_transform: [-0.3, 1.0, 1.8, 0.0, 0.0, 0.0, 1.0],
            right_transform: [1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 1.0],
        }
    }

    fn forwarder(remote: Arc<RecordingRemote>, toggles: SendToggles) -> Forwarder {
        Forwarder::new(remote, Arc::new(RwLock::new(toggles)))
    }

    #[test]
    fn test_all_channels_enabled() {
        let remote = Arc::new(RecordingRemote::new(Capabilities::default()));
        forwarder(remote.clone(), SendToggles::default()).forward(&sample_data());

        let calls = remote.calls.lock();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], Call::Head(0.0, 1.6, 2.0));

        let Call::Controller(left) = &calls[1] else { panic!("expected controller call") };
        assert_eq!(left.controller_id, 0);
        assert_eq!(left.suggested_hand, HandType::Left);
        assert_eq!(left.head_relation, HeadRelation::SticksToHead);
        assert_eq!(left.position, Some(Vector3::new(-0.3, 1.0, 1.8)));
        assert_eq!(left.orientation, Quaternion::IDENTITY);
        assert_eq!(left.analog_trigger, 0.0);
        assert!(!left.is_trigger_pressed && !left.is_touchpad_touched);

        let Call::Controller(right) = &calls[2] else { panic!("expected controller call") };
        assert_eq!(right.controller_id, 1);
        assert_eq!(right.suggested_hand, HandType::Right);
    }

    #[test]
    fn test_left_disabled_skips_left_call() {
        let remote = Arc::new(RecordingRemote::new(Capabilities::default()));
        let toggles = SendToggles {
            send_left_position: false,
            send_left_rotation: false,
            ..Default::default()
        };
        forwarder(remote.clone(), toggles).forward(&sample_data());

        let controllers = remote.controller_calls();
        assert_eq!(controllers.len(), 1);
        assert_eq!(controllers[0].suggested_hand, HandType::Right);
    }

    #[test]
    fn test_position_without_rotation_sends_zero_quaternion() {
        let remote = Arc::new(RecordingRemote::new(Capabilities::default()));
        let toggles = SendToggles {
            send_left_position: false,
            send_left_rotation: false,
            send_right_position: true,
            send_right_rotation: false,
        };
        forwarder(remote.clone(), toggles).forward(&sample_data());

        let controllers = remote.controller_calls();
        assert_eq!(controllers.len(), 1);
        assert_eq!(controllers[0].position, Some(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(controllers[0].orientation, Quaternion::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotation_without_position_sends_no_position() {
        let state = controller_state(
            HandType::Left,
            &sample_data(),
            &SendToggles {
                send_left_position: false,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(state.position, None);
        assert_eq!(state.orientation, Quaternion::IDENTITY);
    }

    #[test]
    fn test_head_only_remote() {
        let remote = Arc::new(RecordingRemote::new(Capabilities::HEAD_TRACKING));
        forwarder(remote.clone(), SendToggles::default()).forward(&sample_data());

        assert_eq!(*remote.calls.lock(), vec![Call::Head(0.0, 1.6, 2.0)]);
    }

    #[test]
    fn test_toggle_changes_apply_to_next_frame() {
        let remote = Arc::new(RecordingRemote::new(Capabilities::CONTROLLERS));
        let forwarder = forwarder(remote.clone(), SendToggles::default());

        forwarder.forward(&sample_data());
        forwarder.toggles().write().set(HandType::Right, SendChannel::Position, false);
        forwarder.toggles().write().set(HandType::Right, SendChannel::Rotation, false);
        forwarder.forward(&sample_data());

        assert_eq!(remote.controller_calls().len(), 3);
    }

    #[test]
    fn test_remote_failures_are_counted_not_propagated() {
        let remote = Arc::new(RecordingRemote::failing());
        let forwarder = forwarder(remote.clone(), SendToggles::default());

        forwarder.forward(&sample_data());
        forwarder.forward(&sample_data());

        assert_eq!(
            forwarder.stats(),
            ForwardStats {
                frames_forwarded: 2,
                failed_calls: 6,
            }
        );
    }

    #[test]
    fn test_listener_forwards_notifications() {
        let remote = Arc::new(RecordingRemote::new(Capabilities::default()));
        let forwarder = Arc::new(forwarder(remote.clone(), SendToggles::default()));

        let listener = forwarder.listener();
        listener(sample_data());

        assert_eq!(forwarder.stats().frames_forwarded, 1);
        assert_eq!(remote.calls.lock().len(), 3);
    }
}
