use drawl_protocol::{PlayerId, ServerMessage};

use crate::Screen;

/// Everything that can move the game state forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A decoded message from the server.
    Server(ServerMessage),
    /// Explicit navigation, e.g. back to the home screen.
    SetScreen(Screen),
    /// Binds the game code and our own id right after onboarding,
    /// before the live connection is up.
    SetConnection { code: String, player_id: PlayerId },
    /// Dismisses the inline error.
    ClearError,
    /// A locally detected failure (e.g. a rejected onboarding request)
    /// shown the same way as a server `error`.
    LocalError(String),
}

impl From<ServerMessage> for Action {
    fn from(msg: ServerMessage) -> Self {
        Self::Server(msg)
    }
}
