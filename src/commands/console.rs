//! Interactive console
//!
//! Line-oriented control over stdin: connect/disconnect, device selection and
//! the four hand channel toggles.

use crate::commands::session::{BridgeState, Session};
use crate::forwarder::{HandType, SendChannel, SendToggles};
use crate::tracking::DeviceType;
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

pub const HELP: &str = "\
Commands:
  connect                                   start tracking on the selected device
  disconnect                                stop tracking
  device <legacy|modern>                    select the sensor generation
  send <left|right> <position|rotation> <on|off>
                                            choose which hand channels are sent
  status                                    show connection state and counters
  help                                      show this text
  quit                                      disconnect and exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Connect,
    Disconnect,
    Device(DeviceType),
    Send {
        hand: HandType,
        channel: SendChannel,
        enabled: bool,
    },
    Status,
    Help,
    Quit,
}

impl std::str::FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<String> = line.split_whitespace().map(str::to_ascii_lowercase).collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();

        match words.as_slice() {
            ["connect"] => Ok(ConsoleCommand::Connect),
            ["disconnect"] => Ok(ConsoleCommand::Disconnect),
            ["device", kind] => kind.parse().map(ConsoleCommand::Device).map_err(|e| e.to_string()),
            ["send", hand, channel, state] => {
                let hand = match *hand {
                    "left" => HandType::Left,
                    "right" => HandType::Right,
                    other => return Err(format!("unknown hand '{}'", other)),
                };
                let channel = match *channel {
                    "position" | "pos" => SendChannel::Position,
                    "rotation" | "rot" => SendChannel::Rotation,
                    other => return Err(format!("unknown channel '{}'", other)),
                };
                let enabled = match *state {
                    "on" | "true" | "1" => true,
                    "off" | "false" | "0" => false,
                    other => return Err(format!("expected on or off, got '{}'", other)),
                };
                Ok(ConsoleCommand::Send { hand, channel, enabled })
            }
            ["status"] => Ok(ConsoleCommand::Status),
            ["help"] | ["?"] => Ok(ConsoleCommand::Help),
            ["quit"] | ["exit"] => Ok(ConsoleCommand::Quit),
            [] => Err("empty command".to_string()),
            _ => Err(format!("unknown command '{}', type 'help'", line.trim())),
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn describe_toggles(toggles: &SendToggles) -> String {
    format!(
        "left position {}, left rotation {}, right position {}, right rotation {}",
        on_off(toggles.send_left_position),
        on_off(toggles.send_left_rotation),
        on_off(toggles.send_right_position),
        on_off(toggles.send_right_rotation)
    )
}

/// Run one command against the session and describe the outcome
pub fn execute(session: &mut Session, command: ConsoleCommand) -> String {
    match command {
        ConsoleCommand::Connect => match session.connect() {
            Ok(status) => format!("{} ({})", status, session.device_type()),
            Err(e) => format!("{} ({})", session.status(), e),
        },
        ConsoleCommand::Disconnect => session.disconnect().to_string(),
        ConsoleCommand::Device(device_type) => match session.set_device_type(device_type) {
            Ok(status) => format!("Device: {} ({})", device_type, status),
            Err(e) => format!("Device: {} ({}: {})", device_type, session.status(), e),
        },
        ConsoleCommand::Send { hand, channel, enabled } => {
            session.set_toggle(hand, channel, enabled);
            describe_toggles(&session.toggles())
        }
        ConsoleCommand::Status => {
            let stats = session.stats();
            let mut text = format!(
                "{} ({})\nsending: {}\nframes forwarded: {}, failed remote calls: {}",
                session.status(),
                session.device_type(),
                describe_toggles(&session.toggles()),
                stats.frames_forwarded,
                stats.failed_calls
            );
            if let Some(data) = session.tracking_data() {
                let [x, y, z] = data.head_position;
                text.push_str(&format!("\nhead: ({:.3}, {:.3}, {:.3})", x, y, z));
            }
            text
        }
        ConsoleCommand::Help => HELP.to_string(),
        ConsoleCommand::Quit => {
            session.disconnect();
            "Bye".to_string()
        }
    }
}

/// Read commands until `quit`, end of input or Ctrl-C
pub async fn run<R: AsyncRead + Unpin>(state: BridgeState, input: R) -> Result<()> {
    let mut lines = BufReader::new(input).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                None
            }
        };

        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let output = execute(&mut *state.session.lock().await, command);
        println!("{}", output);

        if command == ConsoleCommand::Quit {
            return Ok(());
        }
    }

    state.session.lock().await.disconnect();
    Ok(())
}
