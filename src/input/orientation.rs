//! # Orientation Mapper Module
//!
//! Converts device tilt samples into the horizontal control axis.
//!
//! The formula is: `x = beta / scale`, with `beta` negated for player 2 so
//! both players' "forward" feels the same on opposing device orientations.
//!
//! ## Usage
//!
//! ```
//! use tilt_pad::channel::outbound;
//! use tilt_pad::input::orientation::{OrientationMapper, OrientationSample};
//! use tilt_pad::session::pairing::PlayerAssignment;
//!
//! let (sender, _queue) = outbound();
//! let mapper = OrientationMapper::new(20.0, sender);
//!
//! let sample = OrientationSample::new(40.0, 10.0);
//! assert_eq!(mapper.map(&sample, PlayerAssignment::One).x, 2.0);
//! assert_eq!(mapper.map(&sample, PlayerAssignment::Two).x, -2.0);
//! ```

use serde::Deserialize;

use crate::channel::ChannelSender;
use crate::protocol::events::{ControlSignal, DEVICE_ORIENTATION_CHANGED};
use crate::session::pairing::PlayerAssignment;

/// One device orientation reading, in degrees.
///
/// `beta` is front-to-back tilt in [-180, 180], `gamma` is left-to-right
/// tilt in [-90, 90]. Only `beta` drives the control axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct OrientationSample {
    pub beta: f64,
    pub gamma: f64,
}

impl OrientationSample {
    /// Creates a sample from both axes.
    #[must_use]
    pub fn new(beta: f64, gamma: f64) -> Self {
        Self { beta, gamma }
    }

    /// Creates a sample where missing sensor axes read as 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilt_pad::input::orientation::OrientationSample;
    ///
    /// let sample = OrientationSample::from_axes(None, Some(12.0));
    /// assert_eq!(sample.beta, 0.0);
    /// assert_eq!(sample.gamma, 12.0);
    /// ```
    #[must_use]
    pub fn from_axes(beta: Option<f64>, gamma: Option<f64>) -> Self {
        Self {
            beta: beta.unwrap_or(0.0),
            gamma: gamma.unwrap_or(0.0),
        }
    }
}

/// Maps orientation samples to control signals.
#[derive(Debug, Clone)]
pub struct OrientationMapper {
    /// Divisor applied to beta (sensitivity preset).
    scale: f64,
    sender: ChannelSender,
}

impl OrientationMapper {
    /// Creates a mapper with the configured scale divisor.
    #[must_use]
    pub fn new(scale: f64, sender: ChannelSender) -> Self {
        Self { scale, sender }
    }

    /// Returns the configured scale divisor.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Maps a sample without emitting.
    #[must_use]
    pub fn map(&self, sample: &OrientationSample, player: PlayerAssignment) -> ControlSignal {
        let beta = match player {
            PlayerAssignment::One => sample.beta,
            PlayerAssignment::Two => -sample.beta,
        };
        ControlSignal::horizontal(beta / self.scale)
    }

    /// Maps a sample and emits it as `deviceOrientationChanged`.
    pub fn on_sample(&self, sample: &OrientationSample, player: PlayerAssignment) -> ControlSignal {
        let signal = self.map(sample, player);
        self.sender
            .send(DEVICE_ORIENTATION_CHANGED, Some(signal.to_payload()));
        signal
    }
}
