//! VR remote interface
//!
//! The remote is a client of an external head/controller emulation service.
//! Which halves it exposes depends on the capabilities it was created with.

use crate::forwarder::controller::ControllerState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Address error: {0}")]
    AddressError(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Capability bitmask requested when connecting to the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);
    pub const CONTROLLERS: Capabilities = Capabilities(1);
    pub const HEAD_TRACKING: Capabilities = Capabilities(1 << 1);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::CONTROLLERS | Capabilities::HEAD_TRACKING
    }
}

impl std::ops::BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        Capabilities(self.0 | rhs.0)
    }
}

pub trait HeadRemote: Send + Sync {
    fn set_position(&self, x: f32, y: f32, z: f32) -> RemoteResult<()>;
}

pub trait ControllerRemote: Send + Sync {
    fn set_controller_state(&self, state: &ControllerState) -> RemoteResult<()>;
}

pub trait VrRemote: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    /// Head tracking half, present when `HEAD_TRACKING` was requested
    fn head(&self) -> Option<&dyn HeadRemote>;

    /// Controller half, present when `CONTROLLERS` was requested
    fn controller(&self) -> Option<&dyn ControllerRemote>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_mask() {
        let both = Capabilities::CONTROLLERS | Capabilities::HEAD_TRACKING;
        assert_eq!(both, Capabilities::default());
        assert_eq!(both.bits(), 3);
        assert!(both.contains(Capabilities::HEAD_TRACKING));
        assert!(!Capabilities::CONTROLLERS.contains(Capabilities::HEAD_TRACKING));
        assert!(Capabilities::CONTROLLERS.contains(Capabilities::NONE));
    }
}
