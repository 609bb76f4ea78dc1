//! # Game Lifecycle Listener
//!
//! Maps remote game-over / restart notifications onto the "show restart
//! control" flag. Sends nothing itself.

use tracing::info;

/// Holder of the restart-control flag.
#[derive(Debug, Default)]
pub struct GameLifecycleListener {
    show_restart: bool,
}

impl GameLifecycleListener {
    /// Creates a listener with the restart control hidden.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the restart control should be offered.
    #[must_use]
    pub fn show_restart(&self) -> bool {
        self.show_restart
    }

    /// Inbound `gameOver`.
    pub fn on_game_over(&mut self) {
        info!("Game over");
        self.show_restart = true;
    }

    /// Inbound `restartGame`, or a local restart request.
    pub fn on_restart_game(&mut self) {
        info!("Game restarted");
        self.show_restart = false;
    }
}
