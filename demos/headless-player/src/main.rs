use std::env;

use drawl::prelude::*;
use drawl::canvas::BRUSH_SIZES;
use rand::Rng;
use tracing_subscriber::EnvFilter;

const ENV_NAME: &str = "DRAWL_NAME";
const ENV_CODE: &str = "DRAWL_CODE";
const ENV_PASSWORD: &str = "DRAWL_PASSWORD";

const GUESSES: [&str; 6] = ["cat", "house", "boat", "tree", "rocket", "pizza"];

// ---------------------------------------------------------------------------
// Auto-player
// ---------------------------------------------------------------------------

/// Plays whatever the current screen asks for, once per turn.
#[derive(Default)]
struct Bot {
    added_ai: bool,
    started: bool,
    last_turn: Option<u32>,
    voted: bool,
}

impl Bot {
    /// Reacts to the latest state. Returns `true` when the bot is done.
    fn act(&mut self, client: &mut GameClient) -> Result<bool, DrawlError> {
        let state = client.state();
        match state.screen {
            Screen::Home => {}
            Screen::Lobby => {
                if !state.is_host() {
                    return Ok(false);
                }
                if !self.added_ai && state.players.len() < 2 {
                    client.add_ai();
                    self.added_ai = true;
                } else if !self.started && state.players.len() >= 2 {
                    tracing::info!(players = state.players.len(), "starting game");
                    client.start_game();
                    self.started = true;
                }
            }
            Screen::Playing => {
                if state.waiting || self.last_turn == Some(state.round) {
                    return Ok(false);
                }
                let round = state.round;
                match state.turn_kind {
                    TurnKind::Draw => {
                        tracing::info!(round, prompt = %state.prompt, "drawing");
                        scribble(client.canvas_mut());
                        client.submit_drawing()?;
                    }
                    TurnKind::Guess => {
                        let guess = GUESSES[rand::rng().random_range(0..GUESSES.len())];
                        tracing::info!(round, guess, "guessing");
                        client.submit_guess(guess);
                    }
                }
                self.last_turn = Some(round);
            }
            Screen::Reveal => {
                if state.voting_done {
                    let mut scores: Vec<_> = state
                        .scores
                        .iter()
                        .map(|(id, score)| (state.player_name(id).to_string(), *score))
                        .collect();
                    scores.sort_by(|a, b| b.1.cmp(&a.1));
                    tracing::info!(?scores, "final scores");
                    return Ok(true);
                }
                if !self.voted {
                    let success: Vec<usize> = (0..state.chains.len()).collect();
                    let favorite = first_drawing(&state.chains);
                    client.submit_votes(success, favorite);
                    self.voted = true;
                }
            }
            Screen::AiError => {
                tracing::error!(
                    error = state.last_fatal_error.as_deref().unwrap_or_default(),
                    "server AI failed"
                );
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn first_drawing(chains: &[drawl::protocol::Chain]) -> Option<EntryKey> {
    chains.iter().enumerate().find_map(|(c, chain)| {
        chain
            .entries
            .iter()
            .position(|e| e.has_drawing())
            .map(|e| EntryKey::new(c, e))
    })
}

/// A few random strokes in random colors.
fn scribble(canvas: &mut StrokeCanvas) {
    let mut rng = rand::rng();
    for _ in 0..rng.random_range(2..5) {
        let brush = canvas.brush_mut();
        brush.set_color(PALETTE[rng.random_range(0..PALETTE.len())]);
        brush.set_width(BRUSH_SIZES[rng.random_range(0..BRUSH_SIZES.len())]);

        let segments = rng.random_range(1..6);
        let mut point = || Point::new(rng.random_range(0.0..600.0), rng.random_range(0.0..600.0));
        canvas.begin_stroke(point());
        for _ in 0..segments {
            canvas.extend_stroke(point());
        }
        canvas.commit_stroke();
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ClientConfig::from_env()?;
    let name = env::var(ENV_NAME).unwrap_or_else(|_| "Headless".to_string());
    tracing::info!(host = %config.host, secure = config.secure, %name, "starting headless player");

    let mut client = GameClient::new(config);
    let session = match env::var(ENV_CODE) {
        Ok(code) => client.join_game(&name, &code).await?,
        Err(_) => {
            let password = env::var(ENV_PASSWORD).unwrap_or_default();
            client.create_game(&name, &password).await?
        }
    };
    tracing::info!(game = %session.code, player_id = %session.player_id, "seated");

    let mut link = client.connection().watch_status();
    let mut bot = Bot::default();
    loop {
        tokio::select! {
            result = client.step() => {
                result?;
                if bot.act(&mut client)? {
                    break;
                }
            }
            closed = link.wait_for(|l| l.status == LinkStatus::Closed) => {
                closed?;
                tracing::warn!("connection closed by server");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    client.leave();
    Ok(())
}
