use crate::forwarder::controller::ControllerState;
use crate::forwarder::remote::{Capabilities, ControllerRemote, HeadRemote, RemoteResult, VrRemote};

/// Dry-run remote that logs each call instead of sending it
pub struct LogRemote {
    app_name: String,
    capabilities: Capabilities,
}

impl LogRemote {
    pub fn new(app_name: &str, capabilities: Capabilities) -> Self {
        tracing::info!("Dry run: remote calls for {} are logged only", app_name);
        Self {
            app_name: app_name.to_string(),
            capabilities,
        }
    }
}

impl HeadRemote for LogRemote {
    fn set_position(&self, x: f32, y: f32, z: f32) -> RemoteResult<()> {
        tracing::debug!(app = %self.app_name, x, y, z, "Head.SetPosition");
        Ok(())
    }
}

impl ControllerRemote for LogRemote {
    fn set_controller_state(&self, state: &ControllerState) -> RemoteResult<()> {
        tracing::debug!(
            app = %self.app_name,
            controller = state.controller_id,
            hand = %state.suggested_hand,
            orientation = ?state.orientation,
            position = ?state.position,
            "Controller.SetControllerState"
        );
        Ok(())
    }
}

impl VrRemote for LogRemote {
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
