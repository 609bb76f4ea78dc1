//! # Controller Event Contract
//!
//! Event names and payload types exchanged with the game peer.
//!
//! ## Outbound (controller → peer)
//!
//! | Event | Payload |
//! |-------|---------|
//! | `deviceOrientationChanged` | `{x, y: 0}` |
//! | `newActiveInput` | `{inputType}` |
//! | `deleteActiveInput` | `{inputType}` |
//! | `setAssociatedClientId` | identity string |
//! | `restartGame` | none |
//!
//! ## Inbound (peer → controller)
//!
//! | Event | Payload |
//! |-------|---------|
//! | `controllerPairError` | `{message}` |
//! | `controllerPairSuccess` | `{message?, playerNumber?}` |
//! | `restartGame` | none |
//! | `gameOver` | none |

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Control signal, sent on every orientation sample or keyboard tick
pub const DEVICE_ORIENTATION_CHANGED: &str = "deviceOrientationChanged";

/// A discrete input became active
pub const NEW_ACTIVE_INPUT: &str = "newActiveInput";

/// A discrete input became inactive
pub const DELETE_ACTIVE_INPUT: &str = "deleteActiveInput";

/// Identity submission
pub const SET_ASSOCIATED_CLIENT_ID: &str = "setAssociatedClientId";

/// Restart request (outbound) and restart notification (inbound)
pub const RESTART_GAME: &str = "restartGame";

/// Pairing was rejected by the peer
pub const CONTROLLER_PAIR_ERROR: &str = "controllerPairError";

/// Pairing was accepted by the peer
pub const CONTROLLER_PAIR_SUCCESS: &str = "controllerPairSuccess";

/// The remote game ended
pub const GAME_OVER: &str = "gameOver";

/// Input kind reported for held keyboard keys
pub const INPUT_KIND_KEYDOWN: &str = "keydown";

/// Normalized control signal.
///
/// `y` is reserved and always 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlSignal {
    pub x: f64,
    pub y: f64,
}

impl ControlSignal {
    /// Creates a signal on the horizontal axis.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilt_pad::protocol::events::ControlSignal;
    ///
    /// let signal = ControlSignal::horizontal(1.5);
    /// assert_eq!(signal.y, 0.0);
    /// ```
    #[must_use]
    pub fn horizontal(x: f64) -> Self {
        Self { x, y: 0.0 }
    }

    /// JSON payload for `deviceOrientationChanged`
    #[must_use]
    pub fn to_payload(&self) -> Value {
        json!({ "x": self.x, "y": self.y })
    }
}

/// JSON payload for `newActiveInput` / `deleteActiveInput`
#[must_use]
pub fn active_input_payload(kind: &str) -> Value {
    json!({ "inputType": kind })
}

/// Payload of `controllerPairError`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PairErrorPayload {
    pub message: String,
}

/// Payload of `controllerPairSuccess`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairSuccessPayload {
    #[serde(default)]
    pub message: Option<String>,
    /// Any integer is accepted here; only 1 and 2 name a player slot.
    #[serde(default)]
    pub player_number: Option<i64>,
}
