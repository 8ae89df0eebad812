//! `GameClient`: the single loop that owns the game state.
//!
//! Every inbound message is handled to completion before the next one is
//! taken:
//!
//! ```text
//! recv ──→ TurnController::observe ──→ reduce ──→ auto-submit check
//! ```

use drawl_canvas::StrokeCanvas;
use drawl_game::{reduce, Action, GameState};
use drawl_protocol::{ClientMessage, EntryKey, PlayerId, ServerMessage};

use crate::connection::{ConnectionManager, LinkStatus};
use crate::onboarding::{OnboardingClient, Session};
use crate::turn::TurnController;
use crate::{ClientConfig, DrawlError, OnboardingError};

/// One player's view of one game.
pub struct GameClient {
    state: GameState,
    connection: ConnectionManager,
    onboarding: OnboardingClient,
    canvas: StrokeCanvas,
    turn: TurnController,
}

impl GameClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            state: GameState::default(),
            onboarding: OnboardingClient::new(config.clone()),
            connection: ConnectionManager::new(config),
            canvas: StrokeCanvas::new(),
            turn: TurnController::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn canvas(&self) -> &StrokeCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut StrokeCanvas {
        &mut self.canvas
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn link_status(&self) -> LinkStatus {
        self.connection.status()
    }

    // -- Lifecycle --

    /// Creates a game as host and connects to it.
    ///
    /// A rejection is also recorded as the inline error.
    pub async fn create_game(&mut self, name: &str, password: &str) -> Result<Session, DrawlError> {
        let result = self.onboarding.create_game(name, password).await;
        self.finish_onboarding(result)
    }

    /// Joins an existing game and connects to it.
    pub async fn join_game(&mut self, name: &str, code: &str) -> Result<Session, DrawlError> {
        let result = self.onboarding.join_game(name, code).await;
        self.finish_onboarding(result)
    }

    fn finish_onboarding(
        &mut self,
        result: Result<Session, OnboardingError>,
    ) -> Result<Session, DrawlError> {
        match result {
            Ok(session) => {
                self.join(&session);
                Ok(session)
            }
            Err(e) => {
                if let OnboardingError::Rejected { message, .. } = &e {
                    self.dispatch(Action::LocalError(message.clone()));
                }
                Err(e.into())
            }
        }
    }

    /// Binds code and self id from `session`, then opens the connection.
    ///
    /// # Panics
    /// Panics outside a Tokio runtime; see [`ConnectionManager::connect`].
    pub fn join(&mut self, session: &Session) {
        self.dispatch(Action::SetConnection {
            code: session.code.clone(),
            player_id: session.player_id.clone(),
        });
        self.connection.connect(&session.token, &session.code);
    }

    /// Drops the connection and goes back to the home screen.
    pub fn leave(&mut self) {
        self.connection.disconnect();
        self.canvas.reset();
        self.turn.disarm();
        self.dispatch(Action::SetScreen(drawl_game::Screen::Home));
    }

    // -- State --

    /// Applies a local action.
    pub fn dispatch(&mut self, action: Action) {
        self.state = reduce(&self.state, &action);
    }

    /// Waits for the next message from the server.
    pub async fn next_message(&mut self) -> ServerMessage {
        self.connection.recv().await
    }

    /// Reduces one server message and runs whatever it triggers.
    ///
    /// A new turn starts on a blank canvas; a drawing turn that times out
    /// submits the canvas as-is, exactly once.
    pub fn handle(&mut self, msg: ServerMessage) -> Result<(), DrawlError> {
        self.turn.observe(&msg);
        if matches!(msg, ServerMessage::TurnStart(_)) {
            self.canvas.reset();
        }
        self.dispatch(Action::Server(msg));

        if self.turn.take_due(&self.state) {
            tracing::debug!(round = self.state.round, "time up; submitting drawing");
            let drawing = self.canvas.take_artifact()?;
            self.send(ClientMessage::SubmitDrawing { drawing });
        }
        Ok(())
    }

    /// Waits for the next message and handles it.
    pub async fn step(&mut self) -> Result<(), DrawlError> {
        let msg = self.next_message().await;
        self.handle(msg)
    }

    // -- Player actions --

    fn send(&self, msg: ClientMessage) -> bool {
        self.connection.send(&msg)
    }

    /// Host: adds an AI seat.
    pub fn add_ai(&self) -> bool {
        self.send(ClientMessage::AddAi)
    }

    /// Host: starts the game.
    pub fn start_game(&self) -> bool {
        self.send(ClientMessage::StartGame)
    }

    /// Submits the canvas as this turn's drawing and clears it.
    pub fn submit_drawing(&mut self) -> Result<bool, DrawlError> {
        let drawing = self.canvas.take_artifact()?;
        self.turn.disarm();
        Ok(self.send(ClientMessage::SubmitDrawing { drawing }))
    }

    pub fn submit_guess(&mut self, guess: &str) -> bool {
        self.turn.disarm();
        self.send(ClientMessage::SubmitGuess {
            guess: guess.trim().to_string(),
        })
    }

    /// Host: removes a player.
    pub fn kick_player(&self, player_id: &PlayerId) -> bool {
        self.send(ClientMessage::KickPlayer {
            player_id: player_id.clone(),
        })
    }

    /// Reveal-phase vote: the chains that survived plus one favourite.
    pub fn submit_votes(&self, success_chains: Vec<usize>, fav_drawing: Option<EntryKey>) -> bool {
        self.send(ClientMessage::SubmitVotes {
            success_chains,
            fav_drawing,
        })
    }

    /// Host: back to the lobby for another game.
    pub fn play_again(&self) -> bool {
        self.send(ClientMessage::PlayAgain)
    }
}
