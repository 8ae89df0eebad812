//! Auto-submission of the drawing when the server's clock runs out.

use drawl_game::GameState;
use drawl_protocol::{ServerMessage, TurnKind};

/// Decides when the current drawing must be submitted on the player's
/// behalf.
///
/// Armed by every `turn_start`, and fires at most once per turn: the
/// first time a drawing turn, not yet submitted, reaches zero seconds.
/// Submitting by hand disarms it.
#[derive(Debug, Clone, Default)]
pub struct TurnController {
    armed: bool,
}

impl TurnController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arms on a new turn. Call before reducing `msg`.
    pub fn observe(&mut self, msg: &ServerMessage) {
        if let ServerMessage::TurnStart(turn) = msg {
            self.armed = true;
            tracing::trace!(round = turn.round, kind = %turn.turn_type, "turn armed");
        }
    }

    /// Returns `true` exactly once per turn, when `state` shows a drawing
    /// turn that timed out before the player submitted.
    pub fn take_due(&mut self, state: &GameState) -> bool {
        let due = self.armed
            && state.turn_kind == TurnKind::Draw
            && !state.waiting
            && state.time_remaining == 0;
        if due {
            self.armed = false;
        }
        due
    }

    /// The player submitted on their own; nothing left to do this turn.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}
