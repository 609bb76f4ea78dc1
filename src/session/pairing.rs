//! # Pairing Session Module
//!
//! Owns the controller identity, the pairing handshake and the connection
//! status shown to the user.
//!
//! ## State Machine
//!
//! ```text
//!              submit_identity            pair success
//!  Unpaired ───────────────────► Pending ──────────────► Paired
//!                                 │  ▲                     │
//!                      pair error │  │ submit_identity     │ submit_identity
//!                                 ▼  │                     │
//!                            PairingError ◄────────────────┘ (via Pending)
//! ```
//!
//! Peer acknowledgements are applied in whatever state they arrive; the
//! peer is authoritative. There is no terminal state.

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::channel::ChannelSender;
use crate::config::PairingConfig;
use crate::error::{ControllerError, Result};
use crate::protocol::events::{PairErrorPayload, PairSuccessPayload, SET_ASSOCIATED_CLIENT_ID};

/// Connection status consumed by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No identity submitted yet
    Unpaired,
    /// Identity sent, waiting for the peer
    PendingPairing,
    /// Peer accepted the identity
    Paired,
    /// Peer rejected the identity; carries the peer's message verbatim
    PairingError(String),
}

/// Player slot assigned by the peer.
///
/// Player 2 gets mirrored tilt controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerAssignment {
    #[default]
    One,
    Two,
}

impl PlayerAssignment {
    /// Converts a wire player number.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilt_pad::session::pairing::PlayerAssignment;
    ///
    /// assert_eq!(PlayerAssignment::from_number(2), Some(PlayerAssignment::Two));
    /// assert_eq!(PlayerAssignment::from_number(3), None);
    /// ```
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(PlayerAssignment::One),
            2 => Some(PlayerAssignment::Two),
            _ => None,
        }
    }

    /// Wire player number.
    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            PlayerAssignment::One => 1,
            PlayerAssignment::Two => 2,
        }
    }
}

/// Pairing handshake and status owner.
#[derive(Debug)]
pub struct PairingSession {
    status: ConnectionStatus,
    player: PlayerAssignment,
    identity: String,
    paired_identity: Option<String>,
    texts: PairingConfig,
    sender: ChannelSender,
}

impl PairingSession {
    /// Creates an unpaired session.
    #[must_use]
    pub fn new(texts: PairingConfig, sender: ChannelSender) -> Self {
        Self {
            status: ConnectionStatus::Unpaired,
            player: PlayerAssignment::default(),
            identity: String::new(),
            paired_identity: None,
            texts,
            sender,
        }
    }

    /// Current connection status.
    #[must_use]
    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    /// Current player slot (1 until the peer says otherwise).
    #[must_use]
    pub fn player(&self) -> PlayerAssignment {
        self.player
    }

    /// Most recently submitted identity; empty before the first submission.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Identity the peer last accepted.
    #[must_use]
    pub fn paired_identity(&self) -> Option<&str> {
        self.paired_identity.as_deref()
    }

    /// Text to show the user for the current status.
    #[must_use]
    pub fn status_text(&self) -> &str {
        match &self.status {
            ConnectionStatus::Unpaired => &self.texts.prompt,
            ConnectionStatus::PendingPairing => &self.texts.pending_text,
            ConnectionStatus::Paired => &self.texts.connected_text,
            ConnectionStatus::PairingError(message) => message,
        }
    }

    /// Sends `id` to the peer; the verdict arrives as a pair notification.
    ///
    /// No local validation: empty identities are forwarded as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilt_pad::channel::outbound;
    /// use tilt_pad::config::PairingConfig;
    /// use tilt_pad::session::pairing::{ConnectionStatus, PairingSession};
    ///
    /// let (sender, _queue) = outbound();
    /// let mut session = PairingSession::new(PairingConfig::default(), sender);
    ///
    /// session.submit_identity("");
    /// assert_eq!(session.status(), &ConnectionStatus::PendingPairing);
    /// ```
    pub fn submit_identity(&mut self, id: &str) {
        info!("Submitting identity {:?}", id);
        self.identity = id.to_string();
        self.status = ConnectionStatus::PendingPairing;
        self.sender
            .send(SET_ASSOCIATED_CLIENT_ID, Some(Value::String(id.to_string())));
    }

    /// Applies a `controllerPairError` notification.
    ///
    /// # Errors
    ///
    /// Returns error if the payload has no `message`; the status is left
    /// unchanged.
    pub fn on_pair_error(&mut self, payload: Option<&Value>) -> Result<()> {
        let payload = payload.ok_or_else(|| {
            ControllerError::Protocol("controllerPairError without payload".to_string())
        })?;
        let PairErrorPayload { message } = PairErrorPayload::deserialize(payload)?;

        if self.status != ConnectionStatus::PendingPairing {
            warn!("Pairing error while {:?}", self.status);
        }

        info!("Pairing rejected: {}", message);
        self.paired_identity = None;
        self.status = ConnectionStatus::PairingError(message);
        Ok(())
    }

    /// Applies a `controllerPairSuccess` notification.
    ///
    /// A missing payload counts as an empty one. An unknown player number
    /// keeps the current assignment.
    ///
    /// # Errors
    ///
    /// Returns error if the payload is malformed; the status is left
    /// unchanged.
    pub fn on_pair_success(&mut self, payload: Option<&Value>) -> Result<()> {
        let payload = match payload {
            Some(value) => PairSuccessPayload::deserialize(value)?,
            None => PairSuccessPayload::default(),
        };

        if let Some(number) = payload.player_number {
            match u8::try_from(number).ok().and_then(PlayerAssignment::from_number) {
                Some(player) => self.player = player,
                None => warn!("Ignoring unknown player number {}", number),
            }
        }

        info!(
            "Paired as player {} ({})",
            self.player.number(),
            payload.message.as_deref().unwrap_or("no message")
        );
        self.paired_identity = Some(self.identity.clone());
        self.status = ConnectionStatus::Paired;
        Ok(())
    }
}
