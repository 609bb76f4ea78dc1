//! # Error Types
//!
//! Custom error types for Tilt Pad using `thiserror`.

use thiserror::Error;

/// Main error type for Tilt Pad
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Engine.IO / Socket.IO framing errors
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket transport errors
    #[error("Transport error: {0}")]
    Transport(String),

    /// Keyboard device errors
    #[error("Keyboard error: {0}")]
    Keyboard(String),

    /// No evdev device with arrow keys was found
    #[error("No keyboard with arrow keys found (tried: {0})")]
    KeyboardNotFound(String),

    /// Logging setup errors
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result type alias for Tilt Pad
pub type Result<T> = std::result::Result<T, ControllerError>;
