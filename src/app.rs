//! # Remote Controller
//!
//! Owns every core component and routes local input, user commands and
//! inbound peer events to them.
//!
//! ## Control Flow
//!
//! ```text
//! keyboard ──► ActiveInputTracker + KeydownAccumulator ─┐
//! tilt feed ─► OrientationMapper ───────────────────────┼─► ChannelSender ─► peer
//! console ──► PairingSession / restart ─────────────────┘
//! peer ─► ControlChannel::dispatch ─► PairingSession / GameLifecycleListener
//! ```
//!
//! Input capture is independent of pairing: signals flow while unpaired or
//! in error.

use tracing::warn;

use crate::channel::{ChannelSender, ControlChannel};
use crate::config::Config;
use crate::input::active::ActiveInputTracker;
use crate::input::keyboard::KeyEvent;
use crate::input::keydown::KeydownAccumulator;
use crate::input::orientation::{OrientationMapper, OrientationSample};
use crate::protocol::events::{ControlSignal, INPUT_KIND_KEYDOWN, RESTART_GAME};
use crate::protocol::packet::SocketEvent;
use crate::session::pairing::{ConnectionStatus, PairingSession, PlayerAssignment};
use crate::session::{register_handlers, SessionState};

/// What the UI shows: status text and whether restart is offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub text: String,
    pub show_restart: bool,
}

/// The controller core.
#[derive(Debug)]
pub struct RemoteController {
    channel: ControlChannel<SessionState>,
    state: SessionState,
    accumulator: KeydownAccumulator,
    mapper: OrientationMapper,
    tracker: ActiveInputTracker,
}

impl RemoteController {
    /// Builds every component around one outbound sender.
    #[must_use]
    pub fn new(config: &Config, sender: ChannelSender) -> Self {
        let pairing = PairingSession::new(config.pairing.clone(), sender.clone());
        let mut channel = ControlChannel::new(sender.clone());
        register_handlers(&mut channel);

        Self {
            state: SessionState::new(pairing),
            accumulator: KeydownAccumulator::new(sender.clone()),
            mapper: OrientationMapper::new(config.input.orientation_scale, sender.clone()),
            tracker: ActiveInputTracker::new(sender),
            channel,
        }
    }

    /// Handles one keyboard event.
    ///
    /// Presses and repeats activate the `keydown` input and tick the
    /// accumulator; arrows move it, other keys re-send the current value.
    /// Releases deactivate the `keydown` input.
    pub fn on_key(&mut self, event: &KeyEvent) {
        if event.is_down() {
            self.tracker.press(INPUT_KIND_KEYDOWN);
            match event.direction() {
                Some(direction) => {
                    self.accumulator.on_key_direction(direction);
                }
                None => {
                    self.accumulator.refresh();
                }
            }
        } else {
            self.tracker.release(INPUT_KIND_KEYDOWN);
            self.accumulator.on_key_release();
        }
    }

    /// Handles one orientation sample for the current player.
    pub fn on_orientation(&mut self, sample: &OrientationSample) -> ControlSignal {
        self.mapper.on_sample(sample, self.state.pairing.player())
    }

    /// Submits an identity for pairing.
    pub fn submit_identity(&mut self, id: &str) {
        self.state.pairing.submit_identity(id);
    }

    /// User-invoked restart.
    ///
    /// Only honored while the restart control is shown.
    ///
    /// # Returns
    ///
    /// `true` if `restartGame` was sent.
    pub fn request_restart(&mut self) -> bool {
        if !self.state.lifecycle.show_restart() {
            warn!("Restart is only available after game over");
            return false;
        }

        self.state.lifecycle.on_restart_game();
        self.channel.send(RESTART_GAME, None);
        true
    }

    /// Dispatches one inbound peer event.
    pub fn handle_event(&mut self, event: &SocketEvent) -> usize {
        self.channel.dispatch(&mut self.state, event)
    }

    /// Current connection status.
    #[must_use]
    pub fn status(&self) -> &ConnectionStatus {
        self.state.pairing.status()
    }

    /// Current player slot.
    #[must_use]
    pub fn player(&self) -> PlayerAssignment {
        self.state.pairing.player()
    }

    /// Current keyboard accumulator value.
    #[must_use]
    pub fn keydown_value(&self) -> i32 {
        self.accumulator.value()
    }

    /// Snapshot for the UI.
    #[must_use]
    pub fn view(&self) -> StatusView {
        StatusView {
            text: self.state.pairing.status_text().to_string(),
            show_restart: self.state.lifecycle.show_restart(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{drain_events, outbound, OutboundQueue};
    use crate::input::keyboard::KeyState;
    use crate::protocol::events::{
        CONTROLLER_PAIR_ERROR, CONTROLLER_PAIR_SUCCESS, DELETE_ACTIVE_INPUT,
        DEVICE_ORIENTATION_CHANGED, GAME_OVER, NEW_ACTIVE_INPUT, SET_ASSOCIATED_CLIENT_ID,
    };
    use evdev::Key;
    use serde_json::json;

    fn controller() -> (RemoteController, OutboundQueue) {
        let (sender, queue) = outbound();
        (RemoteController::new(&Config::default(), sender), queue)
    }

    fn key(key: Key, state: KeyState) -> KeyEvent {
        KeyEvent { key, state }
    }

    fn names(events: &[SocketEvent]) -> Vec<&str> {
        events.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_keyboard_scenario() {
        let (mut c, mut queue) = controller();
        assert_eq!(c.status(), &ConnectionStatus::Unpaired);

        c.on_key(&key(Key::KEY_RIGHT, KeyState::Pressed));
        c.on_key(&key(Key::KEY_RIGHT, KeyState::Repeated));
        c.on_key(&key(Key::KEY_RIGHT, KeyState::Repeated));
        assert_eq!(c.keydown_value(), 3);

        let events = drain_events(&mut queue);
        assert_eq!(
            names(&events),
            vec![
                NEW_ACTIVE_INPUT,
                DEVICE_ORIENTATION_CHANGED,
                DEVICE_ORIENTATION_CHANGED,
                DEVICE_ORIENTATION_CHANGED
            ]
        );
        assert_eq!(events[3].payload, Some(json!({"x": 3.0, "y": 0.0})));

        c.on_key(&key(Key::KEY_LEFT, KeyState::Pressed));
        assert_eq!(c.keydown_value(), 2);

        c.on_key(&key(Key::KEY_LEFT, KeyState::Released));
        assert_eq!(c.keydown_value(), 2);

        let events = drain_events(&mut queue);
        assert_eq!(names(&events), vec![DEVICE_ORIENTATION_CHANGED, DELETE_ACTIVE_INPUT]);
    }

    #[test]
    fn test_key_repeat_yields_single_activation() {
        let (mut c, mut queue) = controller();
        c.on_key(&key(Key::KEY_LEFT, KeyState::Pressed));
        for _ in 0..4 {
            c.on_key(&key(Key::KEY_LEFT, KeyState::Repeated));
        }
        c.on_key(&key(Key::KEY_LEFT, KeyState::Released));

        let events = drain_events(&mut queue);
        let count = |name| events.iter().filter(|e| e.name == name).count();
        assert_eq!(count(NEW_ACTIVE_INPUT), 1);
        assert_eq!(count(DELETE_ACTIVE_INPUT), 1);
        assert_eq!(count(DEVICE_ORIENTATION_CHANGED), 5);
    }

    #[test]
    fn test_non_arrow_key_resends_value() {
        let (mut c, mut queue) = controller();
        c.on_key(&key(Key::KEY_RIGHT, KeyState::Pressed));
        c.on_key(&key(Key::KEY_RIGHT, KeyState::Released));
        drain_events(&mut queue);

        c.on_key(&key(Key::KEY_SPACE, KeyState::Pressed));

        let events = drain_events(&mut queue);
        assert_eq!(names(&events), vec![NEW_ACTIVE_INPUT, DEVICE_ORIENTATION_CHANGED]);
        assert_eq!(events[1].payload, Some(json!({"x": 1.0, "y": 0.0})));
        assert_eq!(c.keydown_value(), 1);
    }

    #[test]
    fn test_pairing_scenario_and_mirrored_tilt() {
        let (mut c, mut queue) = controller();
        let sample = OrientationSample::new(40.0, 0.0);

        assert_eq!(c.on_orientation(&sample).x, 2.0);

        c.submit_identity("");
        assert_eq!(c.status(), &ConnectionStatus::PendingPairing);

        c.handle_event(&SocketEvent::new(
            CONTROLLER_PAIR_ERROR,
            Some(json!({"message": "bad id"})),
        ));
        assert_eq!(c.view().text, "bad id");

        c.handle_event(&SocketEvent::new(
            CONTROLLER_PAIR_SUCCESS,
            Some(json!({"playerNumber": 2})),
        ));
        assert_eq!(c.status(), &ConnectionStatus::Paired);
        assert_eq!(c.player(), PlayerAssignment::Two);
        assert_eq!(c.on_orientation(&sample).x, -2.0);

        let events = drain_events(&mut queue);
        assert_eq!(
            names(&events),
            vec![DEVICE_ORIENTATION_CHANGED, SET_ASSOCIATED_CLIENT_ID, DEVICE_ORIENTATION_CHANGED]
        );
    }

    #[test]
    fn test_input_flows_while_unpaired() {
        let (mut c, mut queue) = controller();
        c.on_orientation(&OrientationSample::new(10.0, 0.0));
        c.on_key(&key(Key::KEY_RIGHT, KeyState::Pressed));

        assert_eq!(c.status(), &ConnectionStatus::Unpaired);
        assert_eq!(drain_events(&mut queue).len(), 3);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let (mut c, mut queue) = controller();
        assert!(!c.request_restart());
        assert!(drain_events(&mut queue).is_empty());

        c.handle_event(&SocketEvent::new(GAME_OVER, None));
        assert!(c.view().show_restart);

        assert!(c.request_restart());
        assert!(!c.view().show_restart);

        let events = drain_events(&mut queue);
        assert_eq!(events, vec![SocketEvent::new(RESTART_GAME, None)]);
    }

    #[test]
    fn test_inbound_restart_hides_control() {
        let (mut c, _queue) = controller();
        c.handle_event(&SocketEvent::new(GAME_OVER, None));
        c.handle_event(&SocketEvent::new(RESTART_GAME, None));
        assert!(!c.view().show_restart);
        assert_eq!(c.status(), &ConnectionStatus::Unpaired);
    }

    #[test]
    fn test_view_initial() {
        let (c, _queue) = controller();
        assert_eq!(
            c.view(),
            StatusView {
                text: "Please enter the clientId to pair controller".to_string(),
                show_restart: false,
            }
        );
    }

    #[test]
    fn test_configured_scale_used() {
        let (sender, _queue) = outbound();
        let mut config = Config::default();
        config.input.orientation_scale = 5.0;
        let mut c = RemoteController::new(&config, sender);

        assert_eq!(c.on_orientation(&OrientationSample::new(40.0, 0.0)).x, 8.0);
    }
}
