use crate::ai_response::{Character, Evidence, GameStatus, TurnResponse};
use crate::message::{Message, MessageType};
use strum_macros::Display;

pub const INITIAL_TURNS: i32 = 15;
pub const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display)]
pub enum GamePhase {
    #[default]
    Idle,
    Playing,
    Error,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Outcome {
    Won,
    Lost,
}

/// Everything the screen shows about the current case. Characters and
/// evidence are only ever replaced from the latest turn response.
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub message_history: Vec<Message>,
    pub turns_left: i32,
    pub suggestions: Vec<String>,
    pub characters: Vec<Character>,
    pub evidence: Vec<Evidence>,
    pub location_name: String,
    pub outcome: Option<Outcome>,
    pub in_flight: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Idle,
            message_history: Vec::new(),
            turns_left: INITIAL_TURNS,
            suggestions: Vec::new(),
            characters: Vec::new(),
            evidence: Vec::new(),
            location_name: String::new(),
            outcome: None,
            in_flight: false,
        }
    }
}

impl GameState {
    /// Back to a blank case. The in-flight flag is left alone.
    pub fn reset(&mut self) {
        *self = Self {
            in_flight: self.in_flight,
            ..Self::default()
        };
    }

    pub fn add_message(&mut self, message: Message) {
        self.message_history.push(message);
    }

    pub fn add_system_message(&mut self, content: impl Into<String>) {
        self.add_message(Message::new(MessageType::System, content.into()));
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Folds one successful turn response into the visible state.
    pub fn merge(&mut self, response: TurnResponse) {
        let is_final = response.is_final();
        self.add_message(Message::new(MessageType::Game, response.narrative));

        self.turns_left = response.turns_left;
        self.suggestions = response.suggestions;
        self.characters = response.characters;
        self.evidence = response.evidence;
        self.location_name = response
            .location_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

        if is_final {
            self.phase = GamePhase::GameOver;
            self.outcome = Some(match response.game_status {
                GameStatus::Won => Outcome::Won,
                GameStatus::Lost | GameStatus::Playing => Outcome::Lost,
            });
            log::info!(
                "Game over ({:?}) with {} turns left",
                self.outcome,
                self.turns_left
            );
        }
    }
}
