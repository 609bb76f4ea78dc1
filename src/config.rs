//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::{ControllerError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub pairing: PairingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Peer endpoint configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,

    #[serde(default = "default_server_path")]
    pub path: String,

    #[serde(default = "default_role")]
    pub role: String,
}

/// Input source configuration
#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// Divisor applied to device tilt (beta degrees) before sending.
    #[serde(default = "default_orientation_scale")]
    pub orientation_scale: f64,

    /// evdev keyboard path; empty means auto-detect.
    #[serde(default)]
    pub keyboard_device: String,

    /// Newline-delimited JSON orientation feed; empty means no sensor.
    #[serde(default)]
    pub orientation_feed: String,
}

/// Status texts shown to the user during pairing
#[derive(Debug, Deserialize, Clone)]
pub struct PairingConfig {
    #[serde(default = "default_prompt")]
    pub prompt: String,

    #[serde(default = "default_pending_text")]
    pub pending_text: String,

    #[serde(default = "default_connected_text")]
    pub connected_text: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path; empty means stdout only.
    #[serde(default)]
    pub file: String,
}

// Default value functions
fn default_server_url() -> String { "http://localhost:52300".to_string() }
fn default_server_path() -> String { "/socket.io/".to_string() }
fn default_role() -> String { "controller".to_string() }

fn default_orientation_scale() -> f64 { 20.0 }

fn default_prompt() -> String { "Please enter the clientId to pair controller".to_string() }
fn default_pending_text() -> String { "Pairing...".to_string() }
fn default_connected_text() -> String { "Controller Connected".to_string() }

fn default_log_level() -> String { "info".to_string() }

/// Accepted values for `logging.level`
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `input.orientation_scale`
const MAX_ORIENTATION_SCALE: f64 = 1000.0;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            path: default_server_path(),
            role: default_role(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            orientation_scale: default_orientation_scale(),
            keyboard_device: String::new(),
            orientation_feed: String::new(),
        }
    }
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            pending_text: default_pending_text(),
            connected_text: default_connected_text(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

impl ServerConfig {
    /// Builds the WebSocket endpoint URL for the Engine.IO handshake.
    ///
    /// `http`/`https` schemes are rewritten to `ws`/`wss` and the role tag is
    /// appended as the `type` query parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilt_pad::config::ServerConfig;
    ///
    /// let server = ServerConfig::default();
    /// assert_eq!(
    ///     server.endpoint_url(),
    ///     "ws://localhost:52300/socket.io/?EIO=4&transport=websocket&type=controller"
    /// );
    /// ```
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        let base = self.url.trim_end_matches('/');
        let base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.to_string()
        };

        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        format!("{}{}?EIO=4&transport=websocket&type={}", base, path, self.role)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tilt_pad::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.server.url.is_empty() {
            return Err(invalid("server url cannot be empty"));
        }

        if !["http://", "https://", "ws://", "wss://"]
            .iter()
            .any(|scheme| self.server.url.starts_with(scheme))
        {
            return Err(invalid("server url must start with http://, https://, ws:// or wss://"));
        }

        if self.server.role.is_empty() {
            return Err(invalid("server role cannot be empty"));
        }

        let scale = self.input.orientation_scale;
        if !scale.is_finite() || scale <= 0.0 || scale > MAX_ORIENTATION_SCALE {
            return Err(invalid(format!(
                "orientation_scale must be greater than 0 and at most {}",
                MAX_ORIENTATION_SCALE
            )));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(invalid("log level must be one of: trace, debug, info, warn, error"));
        }

        Ok(())
    }
}

fn invalid(msg: impl std::fmt::Display) -> ControllerError {
    ControllerError::Config(toml::de::Error::custom(msg))
}
