//! Connection session
//!
//! Holds the user's choices (sensor generation, hand channels) and the one
//! active device manager. Only one sensor streams at a time; switching
//! generations while connected tears the old session down first.

use crate::capture::SensorProviders;
use crate::forwarder::{ForwardStats, Forwarder, HandType, SendChannel, SendToggles};
use crate::tracking::{DeviceManager, DeviceType, TrackingData, TrackingResult};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionStatus {
    Connected,
    NotConnected,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "Connected"),
            ConnectionStatus::NotConnected => write!(f, "Not Connected"),
        }
    }
}

pub struct Session {
    providers: SensorProviders,
    forwarder: Arc<Forwarder>,
    device_type: DeviceType,
    manager: Option<Box<dyn DeviceManager>>,
}

impl Session {
    pub fn new(providers: SensorProviders, forwarder: Arc<Forwarder>, device_type: DeviceType) -> Self {
        Self {
            providers,
            forwarder,
            device_type,
            manager: None,
        }
    }

    /// Start tracking on the selected generation, replacing any running session
    pub fn connect(&mut self) -> TrackingResult<ConnectionStatus> {
        self.disconnect();

        let mut manager = self.providers.create_manager(self.device_type);
        manager.set_listener(self.forwarder.listener());
        manager.start()?;

        if manager.is_started() {
            self.manager = Some(manager);
        } else {
            tracing::warn!("No {} sensor available", self.device_type);
        }

        Ok(self.status())
    }

    pub fn disconnect(&mut self) -> ConnectionStatus {
        if let Some(mut manager) = self.manager.take() {
            manager.stop();
        }
        ConnectionStatus::NotConnected
    }

    /// Select a generation; a live session is restarted on the new one
    pub fn set_device_type(&mut self, device_type: DeviceType) -> TrackingResult<ConnectionStatus> {
        if device_type == self.device_type {
            return Ok(self.status());
        }

        tracing::info!("Switching device type: {} -> {}", self.device_type, device_type);
        self.device_type = device_type;

        if self.status() == ConnectionStatus::Connected {
            self.disconnect();
            return self.connect();
        }
        Ok(self.status())
    }

    pub fn set_toggle(&self, hand: HandType, channel: SendChannel, enabled: bool) {
        self.forwarder.toggles().write().set(hand, channel, enabled);
    }

    pub fn toggles(&self) -> SendToggles {
        *self.forwarder.toggles().read()
    }

    /// Follows the live sensor, so a device that stops delivering frames
    /// reports `NotConnected` even before `disconnect`
    pub fn status(&self) -> ConnectionStatus {
        match &self.manager {
            Some(manager) if manager.is_streaming() => ConnectionStatus::Connected,
            _ => ConnectionStatus::NotConnected,
        }
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// Last accepted frame of the active session
    pub fn tracking_data(&self) -> Option<TrackingData> {
        self.manager.as_ref().map(|manager| manager.tracking_data())
    }

    pub fn stats(&self) -> ForwardStats {
        self.forwarder.stats()
    }
}

/// Session shared between the console and signal handling
#[derive(Clone)]
pub struct BridgeState {
    pub session: Arc<Mutex<Session>>,
}

impl BridgeState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}
