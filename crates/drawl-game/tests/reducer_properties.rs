//! Randomized checks of the reducer's invariants.
//!
//! Every test drives the reducer with message sequences drawn from a
//! seeded `StdRng`, so failures are reproducible.

use std::collections::BTreeSet;

use drawl_game::{reduce, Action, GameState, Screen};
use drawl_protocol::{
    EntryKey, ErrorNotice, GameOver, Player, PlayerId, PlayerJoined, PlayerKind, PlayerLeft,
    RoundComplete, ScoreUpdate, ServerMessage, TurnKind, TurnStart, TurnTick,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEEDS: [u64; 4] = [1, 7, 42, 0xD4A7];

// =========================================================================
// Generators
// =========================================================================

fn pid(n: u32) -> PlayerId {
    PlayerId::new(format!("p{n}"))
}

fn player(n: u32) -> Player {
    Player {
        id: pid(n),
        name: format!("Player {n}"),
        kind: if n % 3 == 0 { PlayerKind::Ai } else { PlayerKind::Human },
        seat_index: n,
    }
}

/// Any message at all, including ones that make no sense in context.
fn arbitrary_message(rng: &mut StdRng) -> ServerMessage {
    match rng.random_range(0..10) {
        0 => ServerMessage::PlayerJoined(PlayerJoined {
            player: player(rng.random_range(0..6)),
        }),
        1 => ServerMessage::PlayerLeft(PlayerLeft {
            player_id: pid(rng.random_range(0..6)),
            host_id: rng.random_bool(0.5).then(|| pid(rng.random_range(0..6))),
        }),
        2 => ServerMessage::TurnStart(TurnStart {
            round: rng.random_range(0..3),
            total_rounds: 3,
            turn_type: if rng.random_bool(0.5) { TurnKind::Draw } else { TurnKind::Guess },
            prompt: "lamp".into(),
            time_limit: rng.random_range(10..=90),
        }),
        3 => ServerMessage::TurnTick(TurnTick {
            remaining: rng.random_range(0..=120),
        }),
        4 => ServerMessage::Waiting,
        5 => ServerMessage::GameOver(GameOver {
            chains: Vec::new(),
            scores: None,
        }),
        6 => ServerMessage::ScoreUpdate(ScoreUpdate {
            scores: None,
            fav_drawing: Some(EntryKey::new(rng.random_range(0..3), 0)),
            voting_done: rng.random_bool(0.5),
        }),
        7 => ServerMessage::Error(ErrorNotice {
            message: "nope".into(),
        }),
        8 => ServerMessage::RoundComplete(RoundComplete {
            round: rng.random_range(0..3),
        }),
        _ => ServerMessage::Unknown {
            kind: "mystery".into(),
        },
    }
}

fn arbitrary_state(rng: &mut StdRng) -> GameState {
    let mut state = GameState::default();
    for _ in 0..rng.random_range(0..20) {
        state = reduce(&state, &Action::Server(arbitrary_message(rng)));
    }
    state
}

// =========================================================================
// Purity
// =========================================================================

#[test]
fn test_reduce_is_deterministic_and_non_mutating() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..200 {
            let state = arbitrary_state(&mut rng);
            let action = Action::Server(arbitrary_message(&mut rng));
            let snapshot = state.clone();

            let first = reduce(&state, &action);
            let second = reduce(&state, &action);

            assert_eq!(first, second, "seed {seed}: outputs differ");
            assert_eq!(state, snapshot, "seed {seed}: input was modified");
        }
    }
}

// =========================================================================
// Join / leave set semantics
// =========================================================================

#[test]
fn test_players_are_exactly_joined_minus_left() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..100 {
            let mut state = GameState::default();
            let mut expected = BTreeSet::new();

            for _ in 0..rng.random_range(1..40) {
                let n = rng.random_range(0..8);
                let msg = if rng.random_bool(0.6) {
                    expected.insert(pid(n));
                    ServerMessage::PlayerJoined(PlayerJoined { player: player(n) })
                } else {
                    expected.remove(&pid(n));
                    ServerMessage::PlayerLeft(PlayerLeft {
                        player_id: pid(n),
                        host_id: None,
                    })
                };
                state = reduce(&state, &Action::Server(msg));
            }

            let ids: Vec<_> = state.players.iter().map(|p| p.id.clone()).collect();
            let unique: BTreeSet<_> = ids.iter().cloned().collect();
            assert_eq!(ids.len(), unique.len(), "seed {seed}: duplicate player ids");
            assert_eq!(unique, expected, "seed {seed}: wrong player set");
        }
    }
}

// =========================================================================
// Timer
// =========================================================================

#[test]
fn test_turn_start_resets_timer_and_ticks_never_increase() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..100 {
            let mut state = arbitrary_state(&mut rng);
            let time_limit = rng.random_range(5..=90);
            state = reduce(
                &state,
                &Action::Server(ServerMessage::TurnStart(TurnStart {
                    round: 0,
                    total_rounds: 2,
                    turn_type: TurnKind::Draw,
                    prompt: "kite".into(),
                    time_limit,
                })),
            );
            assert_eq!(state.time_remaining, state.time_limit);
            assert_eq!(state.time_limit, time_limit);

            // Server counts down, possibly skipping seconds.
            let mut remaining = time_limit;
            while remaining > 0 {
                remaining = remaining.saturating_sub(rng.random_range(1..=3));
                let before = state.time_remaining;
                state = reduce(
                    &state,
                    &Action::Server(ServerMessage::TurnTick(TurnTick { remaining })),
                );
                assert!(state.time_remaining <= before, "seed {seed}: timer went up");
                assert!(state.time_remaining <= state.time_limit);
            }
            assert_eq!(state.time_remaining, 0);
        }
    }
}

#[test]
fn test_time_remaining_never_exceeds_limit() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = GameState::default();
        for _ in 0..2_000 {
            state = reduce(&state, &Action::Server(arbitrary_message(&mut rng)));
            assert!(state.time_remaining <= state.time_limit, "seed {seed}");
        }
    }
}

// =========================================================================
// Rounds
// =========================================================================

#[test]
fn test_rounds_stay_in_range_and_never_decrease() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let total_rounds = rng.random_range(1..=6);
        let mut state = GameState::default();
        let mut last_round = 0;

        // One game as a server would run it: each round opens with
        // turn_start (possibly repeated) and closes with round_complete.
        for round in 0..total_rounds {
            for _ in 0..rng.random_range(1..=3) {
                state = reduce(
                    &state,
                    &Action::Server(ServerMessage::TurnStart(TurnStart {
                        round,
                        total_rounds,
                        turn_type: TurnKind::Guess,
                        prompt: String::new(),
                        time_limit: 60,
                    })),
                );
                assert!(state.round >= last_round);
                assert!(state.round < state.total_rounds);
                last_round = state.round;
            }
            if round + 1 < total_rounds {
                state = reduce(
                    &state,
                    &Action::Server(ServerMessage::RoundComplete(RoundComplete {
                        round: round + 1,
                    })),
                );
                assert!(state.round >= last_round);
                assert!(state.round < state.total_rounds);
                last_round = state.round;
            }
        }
        assert_eq!(state.round, total_rounds - 1);
    }
}

// =========================================================================
// Errors
// =========================================================================

#[test]
fn test_error_never_changes_screen() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..100 {
            let state = arbitrary_state(&mut rng);
            let after = reduce(
                &state,
                &Action::Server(ServerMessage::Error(ErrorNotice {
                    message: "bad move".into(),
                })),
            );
            assert_eq!(after.screen, state.screen);
            assert_eq!(after.last_error.as_deref(), Some("bad move"));
        }
    }
}

#[test]
fn test_set_screen_always_navigates() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..50 {
        let state = arbitrary_state(&mut rng);
        let home = reduce(&state, &Action::SetScreen(Screen::Home));
        assert_eq!(home.screen, Screen::Home);
        assert_eq!(home.players, state.players);
    }
}
