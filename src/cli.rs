use crate::config::{BridgeConfig, RemoteKind};
use crate::tracking::DeviceType;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vridge-kinect")]
#[command(about = "Forward Kinect head and hand tracking to a VR remote")]
#[command(version)]
pub struct Cli {
    /// JSON settings file; command line flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sensor generation: legacy (Xbox 360) or modern (Xbox One)
    #[arg(short, long)]
    pub device: Option<DeviceType>,

    /// Host of the VR remote service
    #[arg(long)]
    pub host: Option<String>,

    /// Port of the VR remote service
    #[arg(long)]
    pub port: Option<u16>,

    /// Log remote calls instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Recorded skeleton frames (JSON lines) to replay as the legacy sensor
    #[arg(long)]
    pub legacy_replay: Option<PathBuf>,

    /// Recorded body frames (JSON lines) to replay as the modern sensor
    #[arg(long)]
    pub modern_replay: Option<PathBuf>,

    /// Delay between replayed frames
    #[arg(long)]
    pub frame_interval_ms: Option<u64>,

    /// Restart replays from the beginning when they end
    #[arg(long = "loop")]
    pub looping: bool,

    /// Connect to the sensor on startup
    #[arg(long)]
    pub connect: bool,

    /// Write the effective settings to this file
    #[arg(long)]
    pub write_config: Option<PathBuf>,
}

impl Cli {
    /// Override file settings with the flags that were given
    pub fn apply(&self, config: &mut BridgeConfig) {
        if let Some(device) = self.device {
            config.device = device;
        }
        if let Some(host) = &self.host {
            config.remote.host = host.clone();
        }
        if let Some(port) = self.port {
            config.remote.port = port;
        }
        if self.dry_run {
            config.remote.kind = RemoteKind::Log;
        }
        if let Some(path) = &self.legacy_replay {
            config.replay.legacy_file = Some(path.clone());
        }
        if let Some(path) = &self.modern_replay {
            config.replay.modern_file = Some(path.clone());
        }
        if let Some(interval) = self.frame_interval_ms {
            config.replay.frame_interval_ms = interval;
        }
        if self.looping {
            config.replay.looping = true;
        }
    }
}
