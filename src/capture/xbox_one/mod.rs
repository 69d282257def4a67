//! Kinect for Xbox One (body API)

pub mod manager;
pub mod sdk;

pub use manager::KinectOneManager;
pub use sdk::{BodyFrame, BodySensor, BodySensorProvider, StaticBodyProvider};
