//! Client-side game state for Drawl.
//!
//! The whole of what the client knows about a game lives in one
//! [`GameState`] value. It only ever changes through [`reduce`], a pure
//! function from the current state and an [`Action`] to the next state:
//!
//! ```text
//! ServerMessage ─┐
//!                ├─→ Action ─→ reduce(&state, &action) ─→ GameState
//! UI decision ───┘
//! ```
//!
//! # Key types
//!
//! - [`GameState`]: the local mirror of the shared game
//! - [`Screen`]: which view the client should be showing
//! - [`Action`]: a server message or a purely local transition
//! - [`reduce`]: the transition function

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::reduce;
pub use state::{GameState, Screen, DEFAULT_TIME_LIMIT, UNKNOWN_PLAYER_NAME};
