//! Wire protocol for the Drawl client.
//!
//! This crate defines the vocabulary the client and the game server speak:
//!
//! - **Types** ([`Player`], [`Chain`], [`EntryKey`], ...): domain values
//!   carried inside payloads.
//! - **Messages** ([`Envelope`], [`ClientMessage`], [`ServerMessage`]):
//!   the tagged frames themselves.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how frames become bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! It is pure data: no I/O, no state.
//!
//! ```text
//! Transport (bytes) → Protocol (ServerMessage) → Game (state reducer)
//! ```

mod codec;
mod error;
mod messages;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use messages::{
    kind, ClientMessage, Envelope, ErrorNotice, GameOver, GameSnapshot, PlayerJoined,
    PlayerLeft, ReturnToLobby, RoundComplete, ScoreUpdate, ServerMessage, TurnStart, TurnTick,
};
pub use types::{
    Chain, ChainEntry, EntryKey, Phase, Player, PlayerId, PlayerKind, Scores, TurnKind,
};
