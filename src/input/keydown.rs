//! # Keydown Accumulator Module
//!
//! Converts left/right arrow press-and-hold into a clamped scalar signal.
//!
//! ## Behavior
//!
//! - Right adds 1 per delivered tick, capped at [`KEYDOWN_MAX`]
//! - Left subtracts 1 per delivered tick, floored at [`KEYDOWN_MIN`]
//! - Right while negative snaps the value to 0 for that tick
//! - Releasing a key leaves the value untouched
//! - Every tick emits `deviceOrientationChanged {x: value, y: 0}`, changed or not
//!
//! ## Usage
//!
//! ```
//! use tilt_pad::channel::outbound;
//! use tilt_pad::input::keydown::{KeyDirection, KeydownAccumulator};
//!
//! let (sender, _queue) = outbound();
//! let mut acc = KeydownAccumulator::new(sender);
//!
//! acc.on_key_direction(KeyDirection::Right);
//! acc.on_key_direction(KeyDirection::Right);
//! acc.on_key_direction(KeyDirection::Left);
//! assert_eq!(acc.value(), 1);
//! ```

use tracing::trace;

use crate::channel::ChannelSender;
use crate::protocol::events::{ControlSignal, DEVICE_ORIENTATION_CHANGED};

/// Upper bound of the accumulator.
pub const KEYDOWN_MAX: i32 = 50;
/// Lower bound of the accumulator.
pub const KEYDOWN_MIN: i32 = -50;

/// Arrow key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Left,
    Right,
}

/// Session-scoped keyboard accumulator.
///
/// The value always stays within `[KEYDOWN_MIN, KEYDOWN_MAX]`.
#[derive(Debug)]
pub struct KeydownAccumulator {
    value: i32,
    sender: ChannelSender,
}

impl KeydownAccumulator {
    /// Creates an accumulator at 0 publishing onto `sender`.
    #[must_use]
    pub fn new(sender: ChannelSender) -> Self {
        Self { value: 0, sender }
    }

    /// Returns the current accumulated value.
    #[must_use]
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Advances the accumulator by one tick in `direction` and emits.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilt_pad::channel::outbound;
    /// use tilt_pad::input::keydown::{KeyDirection, KeydownAccumulator};
    ///
    /// let (sender, _queue) = outbound();
    /// let mut acc = KeydownAccumulator::new(sender);
    ///
    /// acc.on_key_direction(KeyDirection::Left);
    /// acc.on_key_direction(KeyDirection::Left);
    /// assert_eq!(acc.value(), -2);
    ///
    /// // Reversal from negative passes through zero
    /// let signal = acc.on_key_direction(KeyDirection::Right);
    /// assert_eq!(signal.x, 0.0);
    /// ```
    pub fn on_key_direction(&mut self, direction: KeyDirection) -> ControlSignal {
        match direction {
            KeyDirection::Right => {
                if self.value < 0 {
                    self.value = 0;
                } else if self.value < KEYDOWN_MAX {
                    self.value += 1;
                }
            }
            KeyDirection::Left => {
                if self.value > KEYDOWN_MIN {
                    self.value -= 1;
                }
            }
        }

        trace!("Keydown tick {:?} -> {}", direction, self.value);
        self.emit()
    }

    /// Handles a key release. The value persists.
    pub fn on_key_release(&mut self) {
        trace!("Key released, holding {}", self.value);
    }

    /// Re-emits the current value without changing it.
    ///
    /// Used for key presses that are not arrows.
    pub fn refresh(&self) -> ControlSignal {
        self.emit()
    }

    fn emit(&self) -> ControlSignal {
        let signal = ControlSignal::horizontal(f64::from(self.value));
        self.sender
            .send(DEVICE_ORIENTATION_CHANGED, Some(signal.to_payload()));
        signal
    }
}
