use clap::Parser;
use std::time::Duration;
use vridge_kinect_lib::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(vridge_kinect_lib::run(cli));

    // A stdin read left pending by Ctrl-C would otherwise keep the runtime alive
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}
