//! # Session Module
//!
//! Pairing and game lifecycle state driven by inbound peer notifications.
//!
//! [`SessionState`] is the context inbound handlers mutate; [`register_handlers`]
//! wires the four inbound events of the wire contract onto it.

pub mod lifecycle;
pub mod pairing;

use crate::channel::ControlChannel;
use crate::protocol::events::{CONTROLLER_PAIR_ERROR, CONTROLLER_PAIR_SUCCESS, GAME_OVER, RESTART_GAME};
use lifecycle::GameLifecycleListener;
use pairing::PairingSession;

/// State mutated by inbound handlers.
#[derive(Debug)]
pub struct SessionState {
    pub pairing: PairingSession,
    pub lifecycle: GameLifecycleListener,
}

impl SessionState {
    /// Creates session state around a pairing session.
    #[must_use]
    pub fn new(pairing: PairingSession) -> Self {
        Self {
            pairing,
            lifecycle: GameLifecycleListener::new(),
        }
    }
}

/// Registers the inbound handlers for pairing and lifecycle notifications.
pub fn register_handlers(channel: &mut ControlChannel<SessionState>) {
    channel.on(CONTROLLER_PAIR_ERROR, |state, payload| {
        state.pairing.on_pair_error(payload)
    });
    channel.on(CONTROLLER_PAIR_SUCCESS, |state, payload| {
        state.pairing.on_pair_success(payload)
    });
    channel.on(RESTART_GAME, |state, _| {
        state.lifecycle.on_restart_game();
        Ok(())
    });
    channel.on(GAME_OVER, |state, _| {
        state.lifecycle.on_game_over();
        Ok(())
    });
}
