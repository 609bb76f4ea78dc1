//! # Console Commands
//!
//! Line-based stand-in for the identity form and restart button.
//!
//! | Line | Command |
//! |------|---------|
//! | `pair <id>` | Submit identity (`pair` alone submits an empty one) |
//! | `restart` | Restart the game after game over |
//! | `status` | Print the current status |
//! | `quit` | Exit |

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Pair(String),
    Restart,
    Status,
    Quit,
    Unknown(String),
}

/// Parses one console line.
///
/// The identity is everything after the first space, untrimmed.
///
/// # Examples
///
/// ```
/// use tilt_pad::console::{parse_command, Command};
///
/// assert_eq!(parse_command("pair player one"), Command::Pair("player one".to_string()));
/// assert_eq!(parse_command("restart"), Command::Restart);
/// ```
#[must_use]
pub fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let (verb, rest) = match line.split_once(' ') {
        Some((verb, rest)) => (verb, Some(rest)),
        None => (line, None),
    };

    match (verb, rest) {
        ("pair", rest) => Command::Pair(rest.unwrap_or_default().to_string()),
        ("restart", None) => Command::Restart,
        ("status", None) => Command::Status,
        ("quit", None) | ("exit", None) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}
