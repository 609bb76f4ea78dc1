//! # Tilt Pad
//!
//! Turn this machine into a game controller for a Socket.IO game host.
//!
//! Arrow keys (via evdev) and an optional orientation feed are streamed to
//! the host; console commands pair the controller and restart the game.

use std::future::pending;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info, warn};

use tilt_pad::app::{RemoteController, StatusView};
use tilt_pad::channel::link::{pump_outbound, EngineLink};
use tilt_pad::channel::websocket::{self, WsSource};
use tilt_pad::channel::{outbound, ChannelSender};
use tilt_pad::config::Config;
use tilt_pad::console::{parse_command, Command};
use tilt_pad::error::Result as ControllerResult;
use tilt_pad::input::keyboard::{KeyEvent, Keyboard};
use tilt_pad::input::orientation::OrientationSample;
use tilt_pad::input::tilt::TiltFeed;
use tilt_pad::protocol::packet::SocketEvent;

/// Config file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Picks the config path: first CLI argument, else the default.
fn config_path<I: IntoIterator<Item = String>>(args: I) -> String {
    args.into_iter()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Loads the config; a missing file yields defaults.
///
/// # Returns
///
/// The config and whether it came from the file.
fn load_config(path: &str) -> ControllerResult<(Config, bool)> {
    if Path::new(path).exists() {
        Ok((Config::load(path)?, true))
    } else {
        Ok((Config::default(), false))
    }
}

async fn next_inbound(link: &mut Option<EngineLink<WsSource>>) -> ControllerResult<Option<SocketEvent>> {
    match link {
        Some(link) => link.next_event().await,
        None => pending().await,
    }
}

async fn next_key(keyboard: &mut Option<Keyboard>) -> ControllerResult<KeyEvent> {
    match keyboard {
        Some(keyboard) => keyboard.next_key().await,
        None => pending().await,
    }
}

async fn next_sample(feed: &mut Option<TiltFeed<tokio::fs::File>>) -> ControllerResult<Option<OrientationSample>> {
    match feed {
        Some(feed) => feed.next_sample().await,
        None => pending().await,
    }
}

async fn next_line(console: &mut Option<Lines<BufReader<Stdin>>>) -> std::io::Result<Option<String>> {
    match console {
        Some(lines) => lines.next_line().await,
        None => pending().await,
    }
}

/// Connects to the peer and starts the writer task.
///
/// Events are held back until the peer accepts the namespace. On failure
/// the controller keeps running offline; outbound events are dropped.
async fn open_link(config: &Config, sender: &ChannelSender, queue: tilt_pad::channel::OutboundQueue) -> Option<EngineLink<WsSource>> {
    let url = config.server.endpoint_url();
    info!("Connecting to {}", url);

    let (mut sink, source) = match websocket::connect(&url).await {
        Ok(halves) => halves,
        Err(e) => {
            warn!("{}; running offline", e);
            return None;
        }
    };

    let link = EngineLink::new(source, sender.clone());
    let connected = link.connection_state();

    tokio::spawn(async move {
        let mut queue = queue;
        match pump_outbound(&mut sink, &mut queue, connected).await {
            Ok(frames) => debug!("Writer finished after {} frames", frames),
            Err(e) => warn!("Writer stopped: {}", e),
        }
    });

    Some(link)
}

/// Opens the orientation feed if one is configured.
async fn open_feed(path: &str) -> Option<TiltFeed<tokio::fs::File>> {
    if path.is_empty() {
        info!("No orientation sensor configured; keyboard input only");
        return None;
    }

    match TiltFeed::open(path).await {
        Ok(feed) => {
            info!("Reading orientation from {}", path);
            Some(feed)
        }
        Err(e) => {
            warn!("Orientation sensor unavailable ({}): {}", path, e);
            None
        }
    }
}

fn apply_command(controller: &mut RemoteController, command: Command) -> bool {
    match command {
        Command::Pair(id) => controller.submit_identity(&id),
        Command::Restart => {
            controller.request_restart();
        }
        Command::Status => {
            let view = controller.view();
            info!(
                "Status: {} (player {}, restart {})",
                view.text,
                controller.player().number(),
                if view.show_restart { "available" } else { "unavailable" }
            );
        }
        Command::Quit => return false,
        Command::Unknown(line) => {
            warn!("Unknown command {:?} (try: pair <id>, restart, status, quit)", line);
        }
    }
    true
}

fn report_changes(previous: &mut StatusView, current: StatusView) {
    if current.text != previous.text {
        info!("Status: {}", current.text);
    }
    if current.show_restart != previous.show_restart {
        if current.show_restart {
            info!("Game over: type 'restart' to play again");
        } else {
            info!("Restart no longer available");
        }
    }
    *previous = current;
}

/// Main entry point for Tilt Pad
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration and set up logging
///    - Connect to the peer (or continue offline)
///    - Open keyboard and orientation feed when available
///
/// 2. **Main Loop**
///    - Dispatch inbound peer events
///    - Forward key and orientation input
///    - Execute console commands
///    - Log status changes
///    - Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if the config file is invalid or logging cannot be set up.
#[tokio::main]
async fn main() -> Result<()> {
    let path = config_path(std::env::args());
    let (config, from_file) =
        load_config(&path).with_context(|| format!("Failed to load config {}", path))?;

    let _log_guard = tilt_pad::logging::init(&config.logging).context("Failed to set up logging")?;

    info!("Tilt Pad v{} starting...", env!("CARGO_PKG_VERSION"));
    if from_file {
        info!("Loaded configuration from {}", path);
    } else {
        warn!("Config file {} not found, using defaults", path);
    }

    let (sender, queue) = outbound();
    let mut controller = RemoteController::new(&config, sender.clone());
    let mut link = open_link(&config, &sender, queue).await;
    drop(sender);

    let mut keyboard = match Keyboard::open(&config.input.keyboard_device) {
        Ok(keyboard) => Some(keyboard),
        Err(e) => {
            warn!("Keyboard unavailable: {}", e);
            None
        }
    };
    let mut feed = open_feed(&config.input.orientation_feed).await;
    let mut console = Some(BufReader::new(tokio::io::stdin()).lines());

    let mut view = controller.view();
    info!("{}", view.text);
    info!("Commands: pair <id>, restart, status, quit. Press Ctrl+C to exit");

    loop {
        tokio::select! {
            inbound = next_inbound(&mut link) => match inbound {
                Ok(Some(event)) => {
                    controller.handle_event(&event);
                }
                Ok(None) => {
                    warn!("Connection to peer closed");
                    link = None;
                }
                Err(e) => {
                    warn!("Connection to peer lost: {}", e);
                    link = None;
                }
            },

            key = next_key(&mut keyboard) => match key {
                Ok(key) => controller.on_key(&key),
                Err(e) => {
                    warn!("{}", e);
                    keyboard = None;
                }
            },

            sample = next_sample(&mut feed) => match sample {
                Ok(Some(sample)) => {
                    controller.on_orientation(&sample);
                }
                Ok(None) => {
                    info!("Orientation feed ended");
                    feed = None;
                }
                Err(e) => {
                    warn!("Orientation feed failed: {}", e);
                    feed = None;
                }
            },

            line = next_line(&mut console) => match line {
                Ok(Some(line)) => {
                    if !apply_command(&mut controller, parse_command(&line)) {
                        info!("Quitting...");
                        break;
                    }
                }
                Ok(None) => {
                    debug!("Console closed");
                    console = None;
                }
                Err(e) => {
                    warn!("Console read failed: {}", e);
                    console = None;
                }
            },

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }

        report_changes(&mut view, controller.view());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tilt_pad::session::pairing::ConnectionStatus;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_path_default() {
        assert_eq!(config_path(args(&["tilt-pad"])), DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn test_config_path_from_argument() {
        assert_eq!(config_path(args(&["tilt-pad", "my.toml"])), "my.toml");
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let (config, from_file) = load_config("/nonexistent/tilt-pad.toml").unwrap();
        assert!(!from_file);
        assert_eq!(config.input.orientation_scale, 20.0);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[input]\norientation_scale = -1.0").unwrap();
        assert!(load_config(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_apply_command() {
        let (sender, _queue) = outbound();
        let mut controller = RemoteController::new(&Config::default(), sender);

        assert!(apply_command(&mut controller, Command::Pair("abc".to_string())));
        assert_eq!(controller.status(), &ConnectionStatus::PendingPairing);

        assert!(apply_command(&mut controller, Command::Restart));
        assert!(apply_command(&mut controller, Command::Status));
        assert!(apply_command(&mut controller, Command::Unknown("x".to_string())));
        assert!(!apply_command(&mut controller, Command::Quit));
    }

    #[test]
    fn test_refused_restart_keeps_running_and_sends_nothing() {
        let (sender, mut queue) = outbound();
        let mut controller = RemoteController::new(&Config::default(), sender);

        assert!(apply_command(&mut controller, Command::Restart));
        assert!(queue.try_recv().is_err());
        assert!(!controller.view().show_restart);
    }

    #[test]
    fn test_report_changes_tracks_latest_view() {
        let mut previous = StatusView {
            text: "Pairing...".to_string(),
            show_restart: false,
        };
        let current = StatusView {
            text: "Controller Connected".to_string(),
            show_restart: true,
        };

        report_changes(&mut previous, current.clone());
        assert_eq!(previous, current);
    }
}
