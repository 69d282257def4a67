//! UDP remote
//!
//! Sends every head or controller update as one JSON datagram to the
//! emulation service. Datagrams are tagged with the application name so the
//! receiving side can tell bridges apart.

use crate::forwarder::controller::ControllerState;
use crate::forwarder::remote::{Capabilities, ControllerRemote, HeadRemote, RemoteError, RemoteResult, VrRemote};
use serde::Serialize;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RemoteMessage<'a> {
    #[serde(rename_all = "camelCase")]
    HeadPosition { app_name: &'a str, x: f32, y: f32, z: f32 },
    #[serde(rename_all = "camelCase")]
    ControllerState {
        app_name: &'a str,
        state: &'a ControllerState,
    },
}

/// First IPv4 address, else the first address at all
///
/// `localhost` often resolves to `::1` first, which an IPv4-bound service
/// never receives.
fn pick_address(addresses: impl IntoIterator<Item = SocketAddr>) -> Option<SocketAddr> {
    let mut first = None;
    for address in addresses {
        if address.is_ipv4() {
            return Some(address);
        }
        first.get_or_insert(address);
    }
    first
}

pub struct UdpRemote {
    socket: UdpSocket,
    app_name: String,
    capabilities: Capabilities,
}

impl UdpRemote {
    pub fn connect(host: &str, port: u16, app_name: &str, capabilities: Capabilities) -> RemoteResult<Self> {
        let address = pick_address((host, port).to_socket_addrs()?)
            .ok_or_else(|| RemoteError::AddressError(format!("{}:{} did not resolve", host, port)))?;
        if address.is_ipv6() {
            tracing::warn!("{} resolved to IPv6 only ({}); the remote must listen on IPv6", host, address);
        }

        let bind_address = if address.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_address)?;
        socket.connect(address)?;

        tracing::info!(
            "Remote {} connected to {} (capabilities={:#04b})",
            app_name,
            address,
            capabilities.bits()
        );

        Ok(Self {
            socket,
            app_name: app_name.to_string(),
            capabilities,
        })
    }

    fn send(&self, message: &RemoteMessage<'_>) -> RemoteResult<()> {
        let data = serde_json::to_vec(message)?;
        self.socket.send(&data)?;
        Ok(())
    }
}

impl HeadRemote for UdpRemote {
    fn set_position(&self, x: f32, y: f32, z: f32) -> RemoteResult<()> {
        self.send(&RemoteMessage::HeadPosition {
            app_name: &self.app_name,
            x,
            y,
            z,
        })
    }
}

impl ControllerRemote for UdpRemote {
    fn set_controller_state(&self, state: &ControllerState) -> RemoteResult<()> {
        self.send(&RemoteMessage::ControllerState {
            app_name: &self.app_name,
            state,
        })
    }
}

impl VrRemote for UdpRemote {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn head(&self) -> Option<&dyn HeadRemote> {
        if self.capabilities.contains(Capabilities::HEAD_TRACKING) {
            Some(self as &dyn HeadRemote)
        } else {
            None
        }
    }

    fn controller(&self) -> Option<&dyn ControllerRemote> {
        if self.capabilities.contains(Capabilities::CONTROLLERS) {
            Some(self as &dyn ControllerRemote)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forwarder::controller::HandType;
    use crate::tracking::{Quaternion, Vector3};
    use std::time::Duration;

    fn receiver() -> (UdpSocket, u16) {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let port = socket.local_addr().unwrap().port();
        (socket, port)
    }

    fn receive_json(socket: &UdpSocket) -> serde_json::Value {
        let mut buf = [0u8; 2048];
        let len = socket.recv(&mut buf).unwrap();
        serde_json::from_slice(&buf[..len]).unwrap()
    }

    #[test]
    fn test_head_position_datagram() {
        let (socket, port) = receiver();
        let remote = UdpRemote::connect("127.0.0.1", port, "Vridge.Kinect", Capabilities::default()).unwrap();

        remote.head().unwrap().set_position(0.5, 1.5, 2.0).unwrap();

        let json = receive_json(&socket);
        assert_eq!(json["type"], "headPosition");
        assert_eq!(json["appName"], "Vridge.Kinect");
        assert_eq!(json["y"], 1.5);
    }

    #[test]
    fn test_controller_state_datagram() {
        let (socket, port) = receiver();
        let remote = UdpRemote::connect("127.0.0.1", port, "test", Capabilities::CONTROLLERS).unwrap();
        assert!(remote.head().is_none());

        let state = ControllerState::pose(HandType::Right, Quaternion::ZERO, Some(Vector3::new(1.0, 2.0, 3.0)));
        remote.controller().unwrap().set_controller_state(&state).unwrap();

        let json = receive_json(&socket);
        assert_eq!(json["type"], "controllerState");
        assert_eq!(json["state"]["controllerId"], 1);
        assert_eq!(json["state"]["suggestedHand"], "Right");
        assert_eq!(json["state"]["headRelation"], "SticksToHead");
        assert_eq!(json["state"]["position"]["z"], 3.0);
        assert_eq!(json["state"]["orientation"]["w"], 0.0);
    }

    #[test]
    fn test_pick_address_prefers_ipv4() {
        let v6: SocketAddr = "[::1]:38219".parse().unwrap();
        let v4: SocketAddr = "127.0.0.1:38219".parse().unwrap();

        assert_eq!(pick_address([v6, v4]), Some(v4));
        assert_eq!(pick_address([v6]), Some(v6));
        assert_eq!(pick_address(Vec::new()), None);
    }
}
