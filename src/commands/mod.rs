//! User-facing controls
//!
//! The session owns the connect/disconnect state and the user's selections;
//! the console drives it interactively.

pub mod console;
pub mod session;

pub use session::{BridgeState, ConnectionStatus, Session};
