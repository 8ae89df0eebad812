//! Domain types that travel on the wire inside message payloads.
//!
//! The server encodes small enums (player kind, turn kind, phase) as
//! integers and uses the empty string for "no value" in a few optional
//! fields. Those quirks are absorbed here so nothing above this module
//! ever sees a magic number or an empty id.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Opaque identifier for a player, assigned by the server.
///
/// `#[serde(transparent)]` keeps it a plain JSON string on the wire.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Creates a player id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PlayerId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

/// Running score table, keyed by player.
///
/// A `BTreeMap` keeps iteration (and therefore `Debug` output and
/// equality-based tests) deterministic.
pub type Scores = BTreeMap<PlayerId, u32>;

// ---------------------------------------------------------------------------
// Small integer-coded enums
// ---------------------------------------------------------------------------

/// Whether a seat is held by a person or by the server's AI.
///
/// Wire: `0` = human, `1` = AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerKind {
    #[default]
    Human,
    Ai,
}

impl TryFrom<u8> for PlayerKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Human),
            1 => Ok(Self::Ai),
            other => Err(format!("unknown player type {other}")),
        }
    }
}

impl From<PlayerKind> for u8 {
    fn from(kind: PlayerKind) -> Self {
        match kind {
            PlayerKind::Human => 0,
            PlayerKind::Ai => 1,
        }
    }
}

/// What a player is asked to produce this turn.
///
/// Wire: `0` = draw, `1` = guess. Also used as the kind of a chain entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TurnKind {
    #[default]
    Draw,
    Guess,
}

impl TryFrom<u8> for TurnKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Draw),
            1 => Ok(Self::Guess),
            other => Err(format!("unknown turn type {other}")),
        }
    }
}

impl From<TurnKind> for u8 {
    fn from(kind: TurnKind) -> Self {
        match kind {
            TurnKind::Draw => 0,
            TurnKind::Guess => 1,
        }
    }
}

impl fmt::Display for TurnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draw => write!(f, "draw"),
            Self::Guess => write!(f, "guess"),
        }
    }
}

/// Game phase carried by a full-state snapshot.
///
/// Wire: `0` lobby, `1` playing, `2` reveal. Any other value is kept as
/// [`Phase::Other`] rather than rejected, so a newer server can add phases
/// without breaking decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Phase {
    Lobby,
    Playing,
    Reveal,
    Other(i64),
}

impl From<i64> for Phase {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::Lobby,
            1 => Self::Playing,
            2 => Self::Reveal,
            other => Self::Other(other),
        }
    }
}

impl From<Phase> for i64 {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Lobby => 0,
            Phase::Playing => 1,
            Phase::Reveal => 2,
            Phase::Other(v) => v,
        }
    }
}

// ---------------------------------------------------------------------------
// Players and chains
// ---------------------------------------------------------------------------

/// A seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlayerKind,
    #[serde(rename = "index", default)]
    pub seat_index: u32,
}

impl Player {
    /// Returns `true` for AI-controlled seats.
    pub fn is_ai(&self) -> bool {
        self.kind == PlayerKind::Ai
    }
}

/// One contribution to a chain: a drawing or a guess.
///
/// Exactly one of `drawing` / `guess` is expected, matching `kind`. The
/// server may omit an empty drawing entirely (a timed-out blank turn).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntry {
    pub player_id: PlayerId,
    #[serde(rename = "type")]
    pub kind: TurnKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guess: Option<String>,
}

impl ChainEntry {
    /// Returns `true` if this is a drawing entry with an actual image.
    pub fn has_drawing(&self) -> bool {
        self.kind == TurnKind::Draw
            && self.drawing.as_deref().is_some_and(|d| !d.is_empty())
    }
}

/// A full pass-around sequence seeded by one player's word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub original_word: String,
    pub owner_id: PlayerId,
    #[serde(default, deserialize_with = "serde_util::null_as_default")]
    pub entries: Vec<ChainEntry>,
}

// ---------------------------------------------------------------------------
// EntryKey
// ---------------------------------------------------------------------------

/// Stable reference to one chain entry: `(chain index, entry index)`.
///
/// On the wire this is the string `"<chain>:<entry>"`; it is how a
/// favourite drawing is named in votes and score updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    pub chain: usize,
    pub entry: usize,
}

impl EntryKey {
    pub fn new(chain: usize, entry: usize) -> Self {
        Self { chain, entry }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain, self.entry)
    }
}

impl FromStr for EntryKey {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProtocolError::InvalidMessage(format!("bad entry key {s:?}"));
        let (chain, entry) = s.split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            chain: chain.trim().parse().map_err(|_| invalid())?,
            entry: entry.trim().parse().map_err(|_| invalid())?,
        })
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

pub(crate) mod serde_util {
    //! Field adapters for the server's JSON quirks.

    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Treats a JSON `null` like a missing field (Go marshals nil slices
    /// as `null`).
    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// `Option<T>` carried as a string where `""` means `None`.
    pub mod empty_as_none {
        use super::*;

        pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
        where
            T: Display,
            S: Serializer,
        {
            match value {
                Some(v) => serializer.collect_str(v),
                None => serializer.serialize_str(""),
            }
        }

        pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
        where
            T: FromStr,
            T::Err: Display,
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)?.as_deref() {
                None | Some("") => Ok(None),
                Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_wire_shape() {
        let json = r#"{"id":"a1b2c3d4","name":"Ada","type":1,"index":2}"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.id, PlayerId::new("a1b2c3d4"));
        assert_eq!(player.kind, PlayerKind::Ai);
        assert_eq!(player.seat_index, 2);
        assert!(player.is_ai());

        let back: serde_json::Value = serde_json::to_value(&player).unwrap();
        assert_eq!(back["type"], 1);
        assert_eq!(back["index"], 2);
    }

    #[test]
    fn test_unknown_player_type_is_rejected() {
        let json = r#"{"id":"x","name":"X","type":7,"index":0}"#;
        assert!(serde_json::from_str::<Player>(json).is_err());
    }

    #[test]
    fn test_phase_keeps_unknown_values() {
        let phase: Phase = serde_json::from_str("9").unwrap();
        assert_eq!(phase, Phase::Other(9));
        assert_eq!(serde_json::to_string(&Phase::Reveal).unwrap(), "2");
    }

    #[test]
    fn test_chain_entry_omits_missing_payload() {
        let json = r#"{"playerId":"p1","type":0}"#;
        let entry: ChainEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind, TurnKind::Draw);
        assert!(entry.drawing.is_none());
        assert!(!entry.has_drawing());

        let out = serde_json::to_string(&entry).unwrap();
        assert!(!out.contains("drawing"));
        assert!(!out.contains("guess"));
    }

    #[test]
    fn test_chain_accepts_null_entries() {
        let json = r#"{"originalWord":"cat","ownerId":"p1","entries":null}"#;
        let chain: Chain = serde_json::from_str(json).unwrap();
        assert!(chain.entries.is_empty());
    }

    #[test]
    fn test_entry_key_parse_and_display() {
        let key: EntryKey = "3:1".parse().unwrap();
        assert_eq!(key, EntryKey::new(3, 1));
        assert_eq!(key.to_string(), "3:1");
    }

    #[test]
    fn test_entry_key_rejects_malformed() {
        assert!("3".parse::<EntryKey>().is_err());
        assert!("a:b".parse::<EntryKey>().is_err());
        assert!("".parse::<EntryKey>().is_err());
    }
}
