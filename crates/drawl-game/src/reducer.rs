//! The state transition function.

use drawl_protocol::{
    ErrorNotice, GameOver, GameSnapshot, PlayerJoined, PlayerLeft, ReturnToLobby, RoundComplete,
    ScoreUpdate, ServerMessage, TurnStart, TurnTick,
};

use crate::{Action, GameState, Screen};

/// Computes the state that follows `state` once `action` is applied.
///
/// Pure: `state` is never touched, and equal inputs always give equal
/// outputs. Messages of unknown kind leave the state unchanged.
pub fn reduce(state: &GameState, action: &Action) -> GameState {
    let mut next = state.clone();
    match action {
        Action::Server(msg) => apply_server(&mut next, msg),
        Action::SetScreen(screen) => next.screen = *screen,
        Action::SetConnection { code, player_id } => {
            next.game_code = code.clone();
            next.self_player_id = Some(player_id.clone());
        }
        Action::ClearError => next.last_error = None,
        Action::LocalError(message) => next.last_error = Some(message.clone()),
    }
    next
}

fn apply_server(next: &mut GameState, msg: &ServerMessage) {
    tracing::trace!(kind = msg.kind(), "reducing server message");
    match msg {
        ServerMessage::GameState(snapshot) => apply_snapshot(next, snapshot),
        ServerMessage::PlayerJoined(PlayerJoined { player }) => {
            next.players.retain(|p| p.id != player.id);
            next.players.push(player.clone());
        }
        ServerMessage::PlayerLeft(PlayerLeft { player_id, host_id }) => {
            next.players.retain(|p| &p.id != player_id);
            if let Some(host_id) = host_id {
                next.host_id = Some(host_id.clone());
            }
        }
        ServerMessage::GameStarted => {
            next.screen = Screen::Playing;
            next.waiting = false;
        }
        ServerMessage::TurnStart(turn) => apply_turn_start(next, turn),
        ServerMessage::TurnTick(TurnTick { remaining }) => {
            next.time_remaining = (*remaining).min(next.time_limit);
        }
        ServerMessage::Waiting => next.waiting = true,
        ServerMessage::RoundComplete(RoundComplete { round }) => next.round = *round,
        ServerMessage::GameOver(GameOver { chains, scores }) => {
            next.screen = Screen::Reveal;
            next.chains = chains.clone();
            if let Some(scores) = scores {
                next.scores = scores.clone();
            }
            next.waiting = false;
            next.favorite = None;
            next.voting_done = false;
        }
        ServerMessage::ScoreUpdate(ScoreUpdate {
            scores,
            fav_drawing,
            voting_done,
        }) => {
            if let Some(scores) = scores {
                next.scores = scores.clone();
            }
            if let Some(key) = fav_drawing {
                next.favorite = Some(*key);
            }
            if *voting_done {
                next.voting_done = true;
            }
        }
        ServerMessage::ReturnToLobby(lobby) => apply_return_to_lobby(next, lobby),
        ServerMessage::AiError(ErrorNotice { message }) => {
            next.screen = Screen::AiError;
            next.last_fatal_error = Some(message.clone());
        }
        ServerMessage::Error(ErrorNotice { message }) => {
            next.last_error = Some(message.clone());
        }
        ServerMessage::Unknown { kind } => {
            tracing::debug!(kind = %kind, "ignoring unknown message kind");
        }
    }
}

fn apply_snapshot(next: &mut GameState, snapshot: &GameSnapshot) {
    next.screen = Screen::from(snapshot.phase);
    next.game_code = snapshot.code.clone();
    next.host_id = snapshot.host_id.clone();
    next.players = snapshot.players.clone();
    next.round = snapshot.round;
    next.total_rounds = snapshot.total_rounds;
    if let Some(scores) = &snapshot.scores {
        next.scores = scores.clone();
    }
    if let Some(id) = &snapshot.player_id {
        next.self_player_id = Some(id.clone());
    }
}

fn apply_turn_start(next: &mut GameState, turn: &TurnStart) {
    next.screen = Screen::Playing;
    next.round = turn.round;
    next.total_rounds = turn.total_rounds;
    next.turn_kind = turn.turn_type;
    next.prompt = turn.prompt.clone();
    next.time_limit = turn.time_limit;
    next.time_remaining = turn.time_limit;
    next.waiting = false;
}

fn apply_return_to_lobby(next: &mut GameState, lobby: &ReturnToLobby) {
    next.screen = Screen::Lobby;
    next.players = lobby.players.clone();
    if let Some(scores) = &lobby.scores {
        next.scores = scores.clone();
    }
    if let Some(host_id) = &lobby.host_id {
        next.host_id = Some(host_id.clone());
    }
    next.waiting = false;
    next.chains.clear();
    next.favorite = None;
    next.voting_done = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawl_protocol::{
        Chain, EntryKey, Phase, Player, PlayerId, PlayerKind, Scores, TurnKind,
    };

    fn pid(id: &str) -> PlayerId {
        PlayerId::new(id)
    }

    fn player(id: &str) -> Player {
        Player {
            id: pid(id),
            name: id.to_uppercase(),
            kind: PlayerKind::Human,
            seat_index: 0,
        }
    }

    fn scores(pairs: &[(&str, u32)]) -> Scores {
        pairs.iter().map(|&(id, s)| (pid(id), s)).collect()
    }

    fn server(state: &GameState, msg: ServerMessage) -> GameState {
        reduce(state, &Action::Server(msg))
    }

    fn turn_start(round: u32, turn_type: TurnKind, time_limit: u32) -> ServerMessage {
        ServerMessage::TurnStart(TurnStart {
            round,
            total_rounds: 3,
            turn_type,
            prompt: "cat".into(),
            time_limit,
        })
    }

    fn snapshot(phase: Phase, player_id: Option<&str>) -> ServerMessage {
        ServerMessage::GameState(GameSnapshot {
            code: "ABCD".into(),
            phase,
            players: vec![player("a"), player("b")],
            round: 0,
            total_rounds: 3,
            host_id: Some(pid("a")),
            player_id: player_id.map(pid),
            scores: None,
        })
    }

    // =====================================================================
    // game_state
    // =====================================================================

    #[test]
    fn test_game_state_replaces_snapshot_fields() {
        let state = server(&GameState::default(), snapshot(Phase::Lobby, Some("b")));
        assert_eq!(state.screen, Screen::Lobby);
        assert_eq!(state.game_code, "ABCD");
        assert_eq!(state.players.len(), 2);
        assert_eq!(state.total_rounds, 3);
        assert_eq!(state.host_id, Some(pid("a")));
        assert_eq!(state.self_player_id, Some(pid("b")));
    }

    #[test]
    fn test_game_state_keeps_self_id_when_absent() {
        let bound = reduce(
            &GameState::default(),
            &Action::SetConnection {
                code: "ABCD".into(),
                player_id: pid("b"),
            },
        );
        let state = server(&bound, snapshot(Phase::Playing, None));
        assert_eq!(state.self_player_id, Some(pid("b")));
        assert_eq!(state.screen, Screen::Playing);
    }

    #[test]
    fn test_game_state_keeps_scores_when_absent() {
        let state = GameState {
            scores: scores(&[("a", 4)]),
            ..GameState::default()
        };
        let state = server(&state, snapshot(Phase::Reveal, None));
        assert_eq!(state.score(&pid("a")), 4);
        assert_eq!(state.screen, Screen::Reveal);
    }

    #[test]
    fn test_game_state_unknown_phase_lands_in_lobby() {
        let state = server(&GameState::default(), snapshot(Phase::Other(7), None));
        assert_eq!(state.screen, Screen::Lobby);
    }

    // =====================================================================
    // Players
    // =====================================================================

    #[test]
    fn test_player_joined_replaces_duplicate_id() {
        let state = server(&GameState::default(), snapshot(Phase::Lobby, None));
        let mut renamed = player("a");
        renamed.name = "Ann again".into();
        let state = server(
            &state,
            ServerMessage::PlayerJoined(PlayerJoined { player: renamed }),
        );

        let ids: Vec<_> = state.players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(state.player_name(&pid("a")), "Ann again");
    }

    #[test]
    fn test_player_left_promotes_new_host() {
        let state = server(&GameState::default(), snapshot(Phase::Lobby, None));
        let state = server(
            &state,
            ServerMessage::PlayerLeft(PlayerLeft {
                player_id: pid("a"),
                host_id: Some(pid("b")),
            }),
        );
        assert_eq!(state.players, vec![player("b")]);
        assert_eq!(state.host_id, Some(pid("b")));
    }

    #[test]
    fn test_player_left_without_host_keeps_host() {
        let state = server(&GameState::default(), snapshot(Phase::Lobby, None));
        let state = server(
            &state,
            ServerMessage::PlayerLeft(PlayerLeft {
                player_id: pid("b"),
                host_id: None,
            }),
        );
        assert_eq!(state.host_id, Some(pid("a")));
    }

    // =====================================================================
    // Turns
    // =====================================================================

    #[test]
    fn test_turn_start_resets_timer_and_waiting() {
        let state = GameState {
            waiting: true,
            time_remaining: 3,
            ..GameState::default()
        };
        let state = server(&state, turn_start(1, TurnKind::Guess, 45));
        assert_eq!(state.screen, Screen::Playing);
        assert_eq!(state.round, 1);
        assert_eq!(state.turn_kind, TurnKind::Guess);
        assert_eq!(state.prompt, "cat");
        assert_eq!(state.time_limit, 45);
        assert_eq!(state.time_remaining, 45);
        assert!(!state.waiting);
    }

    #[test]
    fn test_turn_tick_clamps_to_time_limit() {
        let state = server(&GameState::default(), turn_start(0, TurnKind::Draw, 30));
        let state = server(&state, ServerMessage::TurnTick(TurnTick { remaining: 12 }));
        assert_eq!(state.time_remaining, 12);
        let state = server(&state, ServerMessage::TurnTick(TurnTick { remaining: 99 }));
        assert_eq!(state.time_remaining, 30);
    }

    #[test]
    fn test_waiting_then_game_started() {
        let state = server(&GameState::default(), ServerMessage::Waiting);
        assert!(state.waiting);
        let state = server(&state, ServerMessage::GameStarted);
        assert!(!state.waiting);
        assert_eq!(state.screen, Screen::Playing);
    }

    #[test]
    fn test_round_complete_updates_round_only() {
        let state = server(&GameState::default(), turn_start(0, TurnKind::Draw, 60));
        let after = server(&state, ServerMessage::RoundComplete(RoundComplete { round: 1 }));
        assert_eq!(after.round, 1);
        assert_eq!(after, GameState { round: 1, ..state });
    }

    // =====================================================================
    // Reveal
    // =====================================================================

    fn reveal_state() -> GameState {
        let state = GameState {
            favorite: Some(EntryKey::new(0, 0)),
            voting_done: true,
            waiting: true,
            ..GameState::default()
        };
        server(
            &state,
            ServerMessage::GameOver(GameOver {
                chains: vec![Chain {
                    original_word: "cat".into(),
                    owner_id: pid("a"),
                    entries: Vec::new(),
                }],
                scores: Some(scores(&[("a", 2), ("b", 1)])),
            }),
        )
    }

    #[test]
    fn test_game_over_enters_reveal_and_clears_votes() {
        let state = reveal_state();
        assert_eq!(state.screen, Screen::Reveal);
        assert_eq!(state.chains.len(), 1);
        assert_eq!(state.score(&pid("a")), 2);
        assert!(!state.waiting);
        assert_eq!(state.favorite, None);
        assert!(!state.voting_done);
    }

    #[test]
    fn test_score_update_merges_only_present_fields() {
        let state = reveal_state();
        let state = server(
            &state,
            ServerMessage::ScoreUpdate(ScoreUpdate {
                scores: None,
                fav_drawing: Some(EntryKey::new(0, 1)),
                voting_done: false,
            }),
        );
        assert_eq!(state.score(&pid("a")), 2);
        assert_eq!(state.favorite, Some(EntryKey::new(0, 1)));
        assert!(!state.voting_done);

        let state = server(
            &state,
            ServerMessage::ScoreUpdate(ScoreUpdate {
                scores: Some(scores(&[("a", 5)])),
                fav_drawing: None,
                voting_done: true,
            }),
        );
        assert_eq!(state.score(&pid("a")), 5);
        assert_eq!(state.favorite, Some(EntryKey::new(0, 1)));
        assert!(state.voting_done);
    }

    #[test]
    fn test_return_to_lobby_clears_reveal() {
        let state = server(
            &reveal_state(),
            ServerMessage::ScoreUpdate(ScoreUpdate {
                scores: None,
                fav_drawing: Some(EntryKey::new(0, 0)),
                voting_done: true,
            }),
        );
        let state = server(
            &state,
            ServerMessage::ReturnToLobby(ReturnToLobby {
                players: vec![player("a"), player("b")],
                scores: None,
                host_id: Some(pid("a")),
            }),
        );
        assert_eq!(state.screen, Screen::Lobby);
        assert!(state.chains.is_empty());
        assert_eq!(state.favorite, None);
        assert!(!state.voting_done);
        assert_eq!(state.score(&pid("a")), 2);
        assert_eq!(state.host_id, Some(pid("a")));
    }

    // =====================================================================
    // Errors and local actions
    // =====================================================================

    #[test]
    fn test_error_keeps_screen() {
        let state = server(&GameState::default(), snapshot(Phase::Lobby, None));
        let state = server(
            &state,
            ServerMessage::Error(ErrorNotice {
                message: "need 3 players".into(),
            }),
        );
        assert_eq!(state.screen, Screen::Lobby);
        assert_eq!(state.last_error.as_deref(), Some("need 3 players"));

        let state = reduce(&state, &Action::ClearError);
        assert_eq!(state.last_error, None);
    }

    #[test]
    fn test_ai_error_is_fatal_screen() {
        let state = server(
            &GameState::default(),
            ServerMessage::AiError(ErrorNotice {
                message: "model unavailable".into(),
            }),
        );
        assert_eq!(state.screen, Screen::AiError);
        assert_eq!(state.last_fatal_error.as_deref(), Some("model unavailable"));
        assert_eq!(state.last_error, None);
    }

    #[test]
    fn test_unknown_kind_is_noop() {
        let state = server(&GameState::default(), snapshot(Phase::Lobby, None));
        let after = server(
            &state,
            ServerMessage::Unknown {
                kind: "confetti".into(),
            },
        );
        assert_eq!(after, state);
    }

    #[test]
    fn test_set_screen_and_local_error() {
        let state = reduce(&GameState::default(), &Action::SetScreen(Screen::Lobby));
        assert_eq!(state.screen, Screen::Lobby);
        let state = reduce(&state, &Action::LocalError("Game not found".into()));
        assert_eq!(state.last_error.as_deref(), Some("Game not found"));
        assert_eq!(state.screen, Screen::Lobby);
    }

    #[test]
    fn test_reduce_leaves_input_untouched() {
        let state = server(&GameState::default(), snapshot(Phase::Lobby, Some("a")));
        let before = state.clone();
        let _ = server(&state, turn_start(0, TurnKind::Draw, 60));
        assert_eq!(state, before);
    }
}
