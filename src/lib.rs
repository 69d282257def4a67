//! Vridge.Kinect - Kinect skeleton tracking for VR head and controller emulation.
//!
//! Reads head and hand joints from a Kinect (Xbox 360 skeleton API or Xbox One
//! body API) and forwards them to a VR remote as head position and controller
//! poses.

pub mod capture;
pub mod cli;
pub mod commands;
pub mod config;
pub mod forwarder;
pub mod tracking;

use anyhow::Context;
use capture::SensorProviders;
use cli::Cli;
use commands::console::{self, ConsoleCommand};
use commands::{BridgeState, Session};
use config::BridgeConfig;
use forwarder::Forwarder;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vridge_kinect_lib=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the bridge with the given command line
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting Vridge.Kinect v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => BridgeConfig::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => BridgeConfig::default(),
    };
    cli.apply(&mut config);

    if let Some(path) = &cli.write_config {
        config
            .save(path)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        tracing::info!("Settings written to {:?}", path);
    }

    let providers = SensorProviders::from_replay(&config.replay)
        .context("failed to load replay recordings")?
        .with_smoothing(config.smoothing);
    let remote = Forwarder::connect_remote(&config.remote).context("failed to create VR remote")?;
    let forwarder = Arc::new(Forwarder::new(remote, Arc::new(RwLock::new(config.toggles))));

    let state = BridgeState::new(Session::new(providers, forwarder, config.device));

    println!("{}", console::HELP);

    if cli.connect {
        let output = console::execute(&mut *state.session.lock().await, ConsoleCommand::Connect);
        println!("{}", output);
    }

    console::run(state, tokio::io::stdin()).await
}
