use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::Mutex;

use crate::ai::GameMaster;
use crate::ai_response::TurnResponse;
use crate::error::{GameError, SessionError};
use crate::game_state::{GamePhase, GameState};
use crate::message::{Message, MessageType};

const INIT_FAILURE: &str =
    "Error initializing the Game Master. Please check your API key or try again.";

/// The remote call behind a turn. It owns everything it needs, so it can be
/// awaited on another task while the screen keeps drawing.
pub type PendingCall = BoxFuture<'static, CallOutcome>;

#[derive(Debug)]
pub enum CallOutcome {
    Started(Result<TurnResponse, SessionError>),
    Advanced(Result<TurnResponse, SessionError>),
}

/// Runs turns against a Game Master. Each operation is split in two: the
/// request updates the state synchronously and hands back a `PendingCall`,
/// `resolve` folds the outcome of that call back in.
pub struct GameController<G> {
    state: GameState,
    session: Arc<Mutex<G>>,
}

impl<G: GameMaster + 'static> GameController<G> {
    pub fn new(session: G) -> Self {
        Self {
            state: GameState::default(),
            session: Arc::new(Mutex::new(session)),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn start_game(&mut self) -> Result<PendingCall, GameError> {
        if self.state.in_flight {
            return Err(GameError::Busy);
        }
        self.state.reset();
        self.state.phase = GamePhase::Playing;
        self.state.in_flight = true;

        let session = Arc::clone(&self.session);
        Ok(async move {
            let mut session = session.lock().await;
            CallOutcome::Started(session.start().await)
        }
        .boxed())
    }

    pub fn submit_action(&mut self, text: impl Into<String>) -> Result<PendingCall, GameError> {
        let text = text.into();
        if self.state.in_flight {
            return Err(GameError::Busy);
        }
        if self.state.phase != GamePhase::Playing {
            return Err(GameError::NotPlaying);
        }
        if text.trim().is_empty() {
            return Err(GameError::EmptyAction);
        }

        self.state
            .add_message(Message::new(MessageType::User, text.clone()));
        self.state.in_flight = true;

        let session = Arc::clone(&self.session);
        Ok(async move {
            let mut session = session.lock().await;
            CallOutcome::Advanced(session.advance(&text).await)
        }
        .boxed())
    }

    pub fn restart(&mut self) -> Result<PendingCall, GameError> {
        if self.state.in_flight {
            return Err(GameError::Busy);
        }
        log::info!("Restarting from {}", self.state.phase);
        self.state.phase = GamePhase::Idle;
        self.start_game()
    }

    pub fn resolve(&mut self, outcome: CallOutcome) {
        self.state.in_flight = false;
        match outcome {
            CallOutcome::Started(Ok(response)) | CallOutcome::Advanced(Ok(response)) => {
                log::debug!(
                    "Turn resolved: {} turns left, status {}",
                    response.turns_left,
                    response.game_status
                );
                self.state.merge(response);
            }
            CallOutcome::Started(Err(e)) => {
                log::error!("{e}");
                self.state.phase = GamePhase::Error;
                self.state.add_system_message(INIT_FAILURE);
            }
            CallOutcome::Advanced(Err(SessionError::NotInitialized)) => {
                log::error!("Action reached the Game Master before the game was started");
                self.state.add_system_message(
                    "The game session is not initialized. Press Ctrl+R to restart.",
                );
            }
            CallOutcome::Advanced(Err(e)) => {
                log::warn!("{e}");
                self.state.add_system_message(format!(
                    "The Game Master is silent ({e}). Please try again."
                ));
            }
        }
    }
}
