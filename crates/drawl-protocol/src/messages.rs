//! The wire envelope and the two message vocabularies.
//!
//! Every frame, in either direction, is an [`Envelope`]:
//!
//! ```text
//! { "type": "turn_start", "data": { "round": 0, ... } }
//! ```
//!
//! Decoding is two-staged. The codec first produces an `Envelope` with
//! `data` left as raw JSON; then `ServerMessage::try_from` matches on the
//! kind string and parses `data` into that kind's payload. A kind this
//! client doesn't know becomes [`ServerMessage::Unknown`] instead of an
//! error, so a newer server never breaks an older client.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::serde_util::{empty_as_none, null_as_default};
use crate::{Chain, EntryKey, Phase, Player, PlayerId, ProtocolError, Scores, TurnKind};

/// Message kind strings, exactly as they appear in the `type` field.
pub mod kind {
    // Client → server
    pub const ADD_AI: &str = "add_ai";
    pub const START_GAME: &str = "start_game";
    pub const SUBMIT_DRAWING: &str = "submit_drawing";
    pub const SUBMIT_GUESS: &str = "submit_guess";
    pub const KICK_PLAYER: &str = "kick_player";
    pub const SUBMIT_VOTES: &str = "submit_votes";
    pub const PLAY_AGAIN: &str = "play_again";

    // Server → client
    pub const GAME_STATE: &str = "game_state";
    pub const PLAYER_JOINED: &str = "player_joined";
    pub const PLAYER_LEFT: &str = "player_left";
    pub const GAME_STARTED: &str = "game_started";
    pub const TURN_START: &str = "turn_start";
    pub const TURN_TICK: &str = "turn_tick";
    pub const WAITING: &str = "waiting";
    pub const ROUND_COMPLETE: &str = "round_complete";
    pub const GAME_OVER: &str = "game_over";
    pub const SCORE_UPDATE: &str = "score_update";
    pub const RETURN_TO_LOBBY: &str = "return_to_lobby";
    pub const AI_ERROR: &str = "ai_error";
    pub const ERROR: &str = "error";
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The top-level wire wrapper: a kind tag plus a kind-specific object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,

    /// Kind-specific payload. Missing or `null` is accepted inbound;
    /// outbound envelopes always carry an object.
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Builds an envelope, substituting `{}` when there is no payload.
    pub fn new(kind: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            kind: kind.into(),
            data: data.unwrap_or_else(|| json!({})),
        }
    }
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Everything the client can ask the server to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Host adds an AI seat (lobby only).
    AddAi,
    /// Host starts the game.
    StartGame,
    /// Submit this turn's drawing; `drawing` is a PNG data URL.
    SubmitDrawing { drawing: String },
    /// Submit this turn's guess.
    SubmitGuess { guess: String },
    /// Host removes a player.
    KickPlayer { player_id: PlayerId },
    /// Reveal-phase votes: chains that "survived" plus one favourite.
    SubmitVotes {
        success_chains: Vec<usize>,
        fav_drawing: Option<EntryKey>,
    },
    /// Host sends everyone back to the lobby for another game.
    PlayAgain,
}

impl ClientMessage {
    /// The wire kind string.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddAi => kind::ADD_AI,
            Self::StartGame => kind::START_GAME,
            Self::SubmitDrawing { .. } => kind::SUBMIT_DRAWING,
            Self::SubmitGuess { .. } => kind::SUBMIT_GUESS,
            Self::KickPlayer { .. } => kind::KICK_PLAYER,
            Self::SubmitVotes { .. } => kind::SUBMIT_VOTES,
            Self::PlayAgain => kind::PLAY_AGAIN,
        }
    }

    /// The payload object, or `None` for kinds that carry nothing.
    pub fn data(&self) -> Option<Value> {
        match self {
            Self::AddAi | Self::StartGame | Self::PlayAgain => None,
            Self::SubmitDrawing { drawing } => Some(json!({ "drawing": drawing })),
            Self::SubmitGuess { guess } => Some(json!({ "guess": guess })),
            Self::KickPlayer { player_id } => Some(json!({ "playerId": player_id.as_str() })),
            Self::SubmitVotes {
                success_chains,
                fav_drawing,
            } => Some(json!({
                "successChains": success_chains,
                "favDrawing": fav_drawing.map(|k| k.to_string()).unwrap_or_default(),
            })),
        }
    }

    /// Wraps this message in its wire envelope.
    pub fn to_envelope(&self) -> Envelope {
        Envelope::new(self.kind(), self.data())
    }
}

impl From<ClientMessage> for Envelope {
    fn from(msg: ClientMessage) -> Self {
        msg.to_envelope()
    }
}

// ---------------------------------------------------------------------------
// Server → client payloads
// ---------------------------------------------------------------------------

/// `game_state`: full snapshot sent on join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub code: String,
    pub phase: Phase,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<Player>,
    pub round: u32,
    pub total_rounds: u32,
    #[serde(default, with = "empty_as_none")]
    pub host_id: Option<PlayerId>,
    /// Present only when the server tells the recipient who they are.
    #[serde(default, with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Scores>,
}

/// `player_joined`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerJoined {
    pub player: Player,
}

/// `player_left`: also announces a host promotion when the host leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLeft {
    pub player_id: PlayerId,
    #[serde(default, with = "empty_as_none")]
    pub host_id: Option<PlayerId>,
}

/// `turn_start`: the recipient's assignment for this round.
///
/// For a guess turn `prompt` is the drawing (data URL) to guess from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnStart {
    pub round: u32,
    pub total_rounds: u32,
    pub turn_type: TurnKind,
    pub prompt: String,
    pub time_limit: u32,
}

/// `turn_tick`: seconds left, server-authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnTick {
    pub remaining: u32,
}

/// `round_complete`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundComplete {
    pub round: u32,
}

/// `game_over`: every chain, revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    #[serde(default, deserialize_with = "null_as_default")]
    pub chains: Vec<Chain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Scores>,
}

/// `score_update`: sent once all votes are in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Scores>,
    #[serde(default, with = "empty_as_none")]
    pub fav_drawing: Option<EntryKey>,
    #[serde(default)]
    pub voting_done: bool,
}

/// `return_to_lobby`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnToLobby {
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Scores>,
    #[serde(default, with = "empty_as_none")]
    pub host_id: Option<PlayerId>,
}

/// `error` and `ai_error`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    #[serde(default)]
    pub message: String,
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Everything the server can tell the client.
///
/// `GameState` is the full snapshot; every other kind is a delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    GameState(GameSnapshot),
    PlayerJoined(PlayerJoined),
    PlayerLeft(PlayerLeft),
    GameStarted,
    TurnStart(TurnStart),
    TurnTick(TurnTick),
    Waiting,
    RoundComplete(RoundComplete),
    GameOver(GameOver),
    ScoreUpdate(ScoreUpdate),
    ReturnToLobby(ReturnToLobby),
    AiError(ErrorNotice),
    Error(ErrorNotice),
    /// A kind this client does not recognise. Carried through so callers
    /// can log it; reducing it changes nothing.
    Unknown { kind: String },
}

impl ServerMessage {
    /// The wire kind string.
    pub fn kind(&self) -> &str {
        match self {
            Self::GameState(_) => kind::GAME_STATE,
            Self::PlayerJoined(_) => kind::PLAYER_JOINED,
            Self::PlayerLeft(_) => kind::PLAYER_LEFT,
            Self::GameStarted => kind::GAME_STARTED,
            Self::TurnStart(_) => kind::TURN_START,
            Self::TurnTick(_) => kind::TURN_TICK,
            Self::Waiting => kind::WAITING,
            Self::RoundComplete(_) => kind::ROUND_COMPLETE,
            Self::GameOver(_) => kind::GAME_OVER,
            Self::ScoreUpdate(_) => kind::SCORE_UPDATE,
            Self::ReturnToLobby(_) => kind::RETURN_TO_LOBBY,
            Self::AiError(_) => kind::AI_ERROR,
            Self::Error(_) => kind::ERROR,
            Self::Unknown { kind } => kind,
        }
    }

    /// Wraps this message in its wire envelope (what a server would send).
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if a payload fails to serialize.
    pub fn into_envelope(self) -> Result<Envelope, ProtocolError> {
        let kind = self.kind().to_owned();
        let data = match self {
            Self::GameState(d) => Some(to_data(&d)?),
            Self::PlayerJoined(d) => Some(to_data(&d)?),
            Self::PlayerLeft(d) => Some(to_data(&d)?),
            Self::TurnStart(d) => Some(to_data(&d)?),
            Self::TurnTick(d) => Some(to_data(&d)?),
            Self::RoundComplete(d) => Some(to_data(&d)?),
            Self::GameOver(d) => Some(to_data(&d)?),
            Self::ScoreUpdate(d) => Some(to_data(&d)?),
            Self::ReturnToLobby(d) => Some(to_data(&d)?),
            Self::AiError(d) | Self::Error(d) => Some(to_data(&d)?),
            Self::GameStarted | Self::Waiting | Self::Unknown { .. } => None,
        };
        Ok(Envelope::new(kind, data))
    }
}

impl TryFrom<Envelope> for ServerMessage {
    type Error = ProtocolError;

    fn try_from(envelope: Envelope) -> Result<Self, ProtocolError> {
        let Envelope { kind: tag, data } = envelope;
        Ok(match tag.as_str() {
            kind::GAME_STATE => Self::GameState(from_data(data)?),
            kind::PLAYER_JOINED => Self::PlayerJoined(from_data(data)?),
            kind::PLAYER_LEFT => Self::PlayerLeft(from_data(data)?),
            kind::GAME_STARTED => Self::GameStarted,
            kind::TURN_START => Self::TurnStart(from_data(data)?),
            kind::TURN_TICK => Self::TurnTick(from_data(data)?),
            kind::WAITING => Self::Waiting,
            kind::ROUND_COMPLETE => Self::RoundComplete(from_data(data)?),
            kind::GAME_OVER => Self::GameOver(from_data(data)?),
            kind::SCORE_UPDATE => Self::ScoreUpdate(from_data(data)?),
            kind::RETURN_TO_LOBBY => Self::ReturnToLobby(from_data(data)?),
            kind::AI_ERROR => Self::AiError(from_data(data)?),
            kind::ERROR => Self::Error(from_data(data)?),
            _ => Self::Unknown { kind: tag },
        })
    }
}

fn from_data<T: DeserializeOwned>(data: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(data).map_err(ProtocolError::Decode)
}

fn to_data<T: Serialize>(payload: &T) -> Result<Value, ProtocolError> {
    serde_json::to_value(payload).map_err(ProtocolError::Encode)
}
