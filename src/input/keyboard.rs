//! # Keyboard Input Module
//!
//! Reads arrow-key input from a Linux keyboard using the evdev interface.
//!
//! ## Key Values (EV_KEY)
//!
//! | Value | Meaning |
//! |-------|---------|
//! | 1 | Press |
//! | 2 | Auto-repeat while held |
//! | 0 | Release |
//!
//! ## Device Selection
//!
//! An explicit `/dev/input/eventN` path is used as-is. Otherwise the first
//! device (in path order) whose supported keys include both KEY_LEFT and
//! KEY_RIGHT is opened.

use evdev::{Device, EventStream, InputEvent, InputEventKind, Key};
use tracing::{debug, info};

use super::keydown::KeyDirection;
use crate::error::{ControllerError, Result};

/// evdev key value for a release
const KEY_VALUE_RELEASE: i32 = 0;
/// evdev key value for a press
const KEY_VALUE_PRESS: i32 = 1;
/// evdev key value for an auto-repeat
const KEY_VALUE_REPEAT: i32 = 2;

/// Physical state carried by a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Repeated,
    Released,
}

/// A decoded keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
}

impl KeyEvent {
    /// Arrow direction of this key, if it is a left/right arrow.
    #[must_use]
    pub fn direction(&self) -> Option<KeyDirection> {
        match self.key {
            Key::KEY_LEFT => Some(KeyDirection::Left),
            Key::KEY_RIGHT => Some(KeyDirection::Right),
            _ => None,
        }
    }

    /// True for presses and auto-repeats.
    #[must_use]
    pub fn is_down(&self) -> bool {
        matches!(self.state, KeyState::Pressed | KeyState::Repeated)
    }
}

/// Decodes a raw evdev event; non-key events yield `None`.
#[must_use]
pub fn translate(event: &InputEvent) -> Option<KeyEvent> {
    let InputEventKind::Key(key) = event.kind() else {
        return None;
    };

    let state = match event.value() {
        KEY_VALUE_RELEASE => KeyState::Released,
        KEY_VALUE_PRESS => KeyState::Pressed,
        KEY_VALUE_REPEAT => KeyState::Repeated,
        _ => return None,
    };

    Some(KeyEvent { key, state })
}

/// Async keyboard handle.
pub struct Keyboard {
    stream: EventStream,
    device_path: String,
}

impl std::fmt::Debug for Keyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keyboard")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl Keyboard {
    /// Opens the configured keyboard, or auto-detects one if `path` is empty.
    ///
    /// # Errors
    ///
    /// - `KeyboardNotFound`: No device with arrow keys was found
    /// - `Keyboard`: The device could not be opened or streamed
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tilt_pad::input::keyboard::Keyboard;
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let keyboard = Keyboard::open("")?;
    ///     println!("Reading keys from: {}", keyboard.device_path());
    ///     Ok(())
    /// }
    /// ```
    pub fn open(path: &str) -> Result<Self> {
        if path.is_empty() {
            Self::auto_detect()
        } else {
            let device = Device::open(path)
                .map_err(|e| ControllerError::Keyboard(format!("Failed to open {}: {}", path, e)))?;
            Self::from_device(device, path.to_string())
        }
    }

    fn auto_detect() -> Result<Self> {
        let mut candidates: Vec<_> = evdev::enumerate().collect();

        // Sort for deterministic selection when several keyboards are attached
        candidates.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut tried = Vec::new();
        for (path, device) in candidates {
            let has_arrows = device
                .supported_keys()
                .map_or(false, |keys| keys.contains(Key::KEY_LEFT) && keys.contains(Key::KEY_RIGHT));

            debug!(
                "Input device {} ({:?}) arrows: {}",
                path.display(),
                device.name(),
                has_arrows
            );

            if has_arrows {
                return Self::from_device(device, path.to_string_lossy().to_string());
            }
            tried.push(path.to_string_lossy().to_string());
        }

        Err(ControllerError::KeyboardNotFound(if tried.is_empty() {
            "no input devices".to_string()
        } else {
            tried.join(", ")
        }))
    }

    fn from_device(device: Device, device_path: String) -> Result<Self> {
        info!("Using keyboard {:?} at {}", device.name(), device_path);

        let stream = device.into_event_stream().map_err(|e| {
            ControllerError::Keyboard(format!("Failed to stream {}: {}", device_path, e))
        })?;

        Ok(Self { stream, device_path })
    }

    /// Device path this keyboard was opened from.
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Waits for the next key event, skipping sync and other event types.
    ///
    /// # Errors
    ///
    /// Returns `Keyboard` error if the device disappears.
    pub async fn next_key(&mut self) -> Result<KeyEvent> {
        loop {
            let event = self.stream.next_event().await.map_err(|e| {
                ControllerError::Keyboard(format!("Failed to read {}: {}", self.device_path, e))
            })?;

            if let Some(key) = translate(&event) {
                return Ok(key);
            }
        }
    }
}
