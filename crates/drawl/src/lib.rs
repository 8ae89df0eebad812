//! # Drawl
//!
//! Real-time client for Drawl, a drawing and guessing party game where
//! words and drawings are passed around the table in chains.
//!
//! The client keeps a local mirror of the authoritative game state in
//! sync over one persistent WebSocket connection, and turns a player's
//! pointer strokes into the PNG artifacts the server expects.
//!
//! ```text
//! OnboardingClient (HTTP) ──→ Session ──→ ConnectionManager (WebSocket)
//!                                               │ ServerMessage
//!                                               ▼
//!             StrokeCanvas ←── GameClient ──→ reduce ──→ GameState
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drawl::prelude::*;
//!
//! # async fn run() -> Result<(), DrawlError> {
//! let mut client = GameClient::new(ClientConfig::from_env()?);
//! client.join_game("Ann", "WXYZ").await?;
//! loop {
//!     client.step().await?;
//!     if client.state().screen == Screen::Reveal {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod connection;
mod error;
mod onboarding;
mod turn;

pub use client::GameClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_HOST, ENV_HOST, ENV_SECURE};
pub use connection::{ConnectionManager, LinkState, LinkStatus};
pub use error::{ConfigError, DrawlError, OnboardingError};
pub use onboarding::{OnboardingClient, Session, CREATE_PATH, JOIN_PATH};
pub use turn::TurnController;

pub use drawl_canvas as canvas;
pub use drawl_game as game;
pub use drawl_protocol as protocol;
pub use drawl_transport as transport;

/// Everything needed to drive a game from one import.
pub mod prelude {
    pub use crate::{
        ClientConfig, ConnectionManager, DrawlError, GameClient, LinkStatus, OnboardingClient,
        OnboardingError, Session, TurnController,
    };
    pub use drawl_canvas::{map_point, Brush, Point, StrokeCanvas, ViewRect, PALETTE};
    pub use drawl_game::{reduce, Action, GameState, Screen};
    pub use drawl_protocol::{
        ClientMessage, EntryKey, Player, PlayerId, ServerMessage, TurnKind,
    };
}
