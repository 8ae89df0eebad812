//! The game state mirror and the screen it implies.

use std::fmt;

use drawl_protocol::{Chain, ChainEntry, EntryKey, Phase, Player, PlayerId, Scores, TurnKind};

/// Turn length assumed before the server has said otherwise, in seconds.
pub const DEFAULT_TIME_LIMIT: u32 = 60;

/// Display name for a player id not in the current player list.
pub const UNKNOWN_PLAYER_NAME: &str = "Unknown";

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// Which view the client is on.
///
/// ```text
/// Home → Lobby → Playing → Reveal → Lobby → ...
///                   │
///                   └──→ AiError (fatal; only SetScreen leaves it)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Home,
    Lobby,
    Playing,
    Reveal,
    AiError,
}

impl Screen {
    /// Returns `true` while the client is attached to a game.
    pub fn is_in_game(&self) -> bool {
        !matches!(self, Self::Home)
    }
}

impl From<Phase> for Screen {
    /// Unknown phases fall back to the lobby.
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Lobby | Phase::Other(_) => Self::Lobby,
            Phase::Playing => Self::Playing,
            Phase::Reveal => Self::Reveal,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "Home"),
            Self::Lobby => write!(f, "Lobby"),
            Self::Playing => write!(f, "Playing"),
            Self::Reveal => write!(f, "Reveal"),
            Self::AiError => write!(f, "AiError"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// The client's local mirror of the shared game.
///
/// Owned by a single client loop and replaced wholesale by
/// [`reduce`](crate::reduce); nothing mutates it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub screen: Screen,
    /// Empty until onboarding or a snapshot provides it.
    pub game_code: String,
    pub self_player_id: Option<PlayerId>,
    pub host_id: Option<PlayerId>,
    /// Seat order.
    pub players: Vec<Player>,
    pub round: u32,
    pub total_rounds: u32,
    pub turn_kind: TurnKind,
    /// A word for drawing turns, a drawing data URL for guess turns.
    pub prompt: String,
    pub time_limit: u32,
    pub time_remaining: u32,
    /// This player has submitted and is waiting for the others.
    pub waiting: bool,
    pub chains: Vec<Chain>,
    pub scores: Scores,
    /// The favourite drawing picked during the reveal.
    pub favorite: Option<EntryKey>,
    pub voting_done: bool,
    /// Recoverable error shown inline.
    pub last_error: Option<String>,
    /// Error that put the client on the [`Screen::AiError`] screen.
    pub last_fatal_error: Option<String>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            screen: Screen::Home,
            game_code: String::new(),
            self_player_id: None,
            host_id: None,
            players: Vec::new(),
            round: 0,
            total_rounds: 0,
            turn_kind: TurnKind::Draw,
            prompt: String::new(),
            time_limit: DEFAULT_TIME_LIMIT,
            time_remaining: DEFAULT_TIME_LIMIT,
            waiting: false,
            chains: Vec::new(),
            scores: Scores::new(),
            favorite: None,
            voting_done: false,
            last_error: None,
            last_fatal_error: None,
        }
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if we are the host.
    pub fn is_host(&self) -> bool {
        self.self_player_id.is_some() && self.self_player_id == self.host_id
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// The display name for `id`, or [`UNKNOWN_PLAYER_NAME`].
    pub fn player_name(&self, id: &PlayerId) -> &str {
        self.player(id)
            .map_or(UNKNOWN_PLAYER_NAME, |p| p.name.as_str())
    }

    pub fn contains_player(&self, id: &PlayerId) -> bool {
        self.player(id).is_some()
    }

    /// Resolves an entry key against the revealed chains.
    pub fn entry(&self, key: EntryKey) -> Option<&ChainEntry> {
        self.chains.get(key.chain)?.entries.get(key.entry)
    }

    /// Returns `true` during a drawing turn this player still owes.
    pub fn is_drawing_turn(&self) -> bool {
        self.screen == Screen::Playing && self.turn_kind == TurnKind::Draw && !self.waiting
    }

    pub fn score(&self, id: &PlayerId) -> u32 {
        self.scores.get(id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawl_protocol::PlayerKind;

    fn player(id: &str, name: &str) -> Player {
        Player {
            id: PlayerId::new(id),
            name: name.into(),
            kind: PlayerKind::Human,
            seat_index: 0,
        }
    }

    #[test]
    fn test_default_state_is_home_with_full_timer() {
        let state = GameState::default();
        assert_eq!(state.screen, Screen::Home);
        assert_eq!(state.time_limit, 60);
        assert_eq!(state.time_remaining, 60);
        assert_eq!(state.turn_kind, TurnKind::Draw);
        assert!(state.players.is_empty());
        assert!(!state.is_host());
    }

    #[test]
    fn test_screen_from_phase() {
        assert_eq!(Screen::from(Phase::Lobby), Screen::Lobby);
        assert_eq!(Screen::from(Phase::Playing), Screen::Playing);
        assert_eq!(Screen::from(Phase::Reveal), Screen::Reveal);
        assert_eq!(Screen::from(Phase::Other(9)), Screen::Lobby);
    }

    #[test]
    fn test_screen_display() {
        assert_eq!(Screen::AiError.to_string(), "AiError");
        assert_eq!(Screen::Lobby.to_string(), "Lobby");
    }

    #[test]
    fn test_player_name_falls_back_to_unknown() {
        let state = GameState {
            players: vec![player("a", "Ann")],
            ..GameState::default()
        };
        assert_eq!(state.player_name(&PlayerId::new("a")), "Ann");
        assert_eq!(state.player_name(&PlayerId::new("zz")), UNKNOWN_PLAYER_NAME);
    }

    #[test]
    fn test_is_host_requires_matching_ids() {
        let mut state = GameState {
            host_id: Some(PlayerId::new("a")),
            ..GameState::default()
        };
        assert!(!state.is_host());
        state.self_player_id = Some(PlayerId::new("b"));
        assert!(!state.is_host());
        state.self_player_id = Some(PlayerId::new("a"));
        assert!(state.is_host());
    }

    #[test]
    fn test_entry_lookup_is_bounds_checked() {
        let state = GameState {
            chains: vec![Chain {
                original_word: "cat".into(),
                owner_id: PlayerId::new("a"),
                entries: vec![ChainEntry {
                    player_id: PlayerId::new("b"),
                    kind: TurnKind::Draw,
                    drawing: Some("data:image/png;base64,AA".into()),
                    guess: None,
                }],
            }],
            ..GameState::default()
        };
        assert!(state.entry(EntryKey::new(0, 0)).is_some());
        assert!(state.entry(EntryKey::new(0, 1)).is_none());
        assert!(state.entry(EntryKey::new(3, 0)).is_none());
    }
}
