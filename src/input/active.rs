//! # Active Input Tracker
//!
//! Deduplicates discrete-input activation so each physical press yields one
//! `newActiveInput` and one `deleteActiveInput`, however many key-repeat
//! callbacks arrive in between.

use std::collections::HashSet;
use tracing::debug;

use crate::channel::ChannelSender;
use crate::protocol::events::{active_input_payload, DELETE_ACTIVE_INPUT, NEW_ACTIVE_INPUT};

/// Set of input kinds currently held.
#[derive(Debug)]
pub struct ActiveInputTracker {
    active: HashSet<String>,
    sender: ChannelSender,
}

impl ActiveInputTracker {
    /// Creates an empty tracker publishing onto `sender`.
    #[must_use]
    pub fn new(sender: ChannelSender) -> Self {
        Self {
            active: HashSet::new(),
            sender,
        }
    }

    /// Marks `kind` active.
    ///
    /// # Returns
    ///
    /// `true` if this was an inactive→active transition (and a
    /// `newActiveInput` was emitted), `false` if already active.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilt_pad::channel::outbound;
    /// use tilt_pad::input::active::ActiveInputTracker;
    ///
    /// let (sender, _queue) = outbound();
    /// let mut tracker = ActiveInputTracker::new(sender);
    ///
    /// assert!(tracker.press("keydown"));
    /// assert!(!tracker.press("keydown")); // key-repeat
    /// assert!(tracker.release("keydown"));
    /// ```
    pub fn press(&mut self, kind: &str) -> bool {
        if self.active.contains(kind) {
            return false;
        }

        self.active.insert(kind.to_string());
        debug!("Input '{}' active", kind);
        self.sender
            .send(NEW_ACTIVE_INPUT, Some(active_input_payload(kind)));
        true
    }

    /// Marks `kind` inactive.
    ///
    /// # Returns
    ///
    /// `true` if this was an active→inactive transition (and a
    /// `deleteActiveInput` was emitted), `false` if not active.
    pub fn release(&mut self, kind: &str) -> bool {
        if !self.active.remove(kind) {
            return false;
        }

        debug!("Input '{}' inactive", kind);
        self.sender
            .send(DELETE_ACTIVE_INPUT, Some(active_input_payload(kind)));
        true
    }

    /// Returns true if `kind` is currently held.
    #[must_use]
    pub fn is_active(&self, kind: &str) -> bool {
        self.active.contains(kind)
    }

    /// Number of input kinds currently held.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
